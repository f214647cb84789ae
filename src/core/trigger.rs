//! Polls the trigger files written by the download managers' post-processing hooks.

use crossbeam_channel::Sender;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::work::{EpisodeEvent, MovieEvent, WorkItem};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerKind {
    Episode,
    Movie,
    UhdMovie,
}

#[derive(Debug, Clone)]
struct TriggerSource {
    path: PathBuf,
    kind: TriggerKind,
}

pub struct TriggerWatcher {
    // Checked in order; the first existing file wins each poll
    sources: Vec<TriggerSource>,
}

impl TriggerWatcher {
    pub fn new(episode: PathBuf, movie: PathBuf, uhd_movie: PathBuf) -> Self {
        let sources = vec![
            TriggerSource {
                path: episode,
                kind: TriggerKind::Episode,
            },
            TriggerSource {
                path: movie,
                kind: TriggerKind::Movie,
            },
            TriggerSource {
                path: uhd_movie,
                kind: TriggerKind::UhdMovie,
            },
        ];
        Self { sources }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sonarr_data.clone(),
            config.radarr_data.clone(),
            config.uhd_radarr_data.clone(),
        )
    }

    /// Consume at most one trigger file and turn it into a work item.
    ///
    /// The file is removed before parsing, so a malformed trigger is dropped
    /// rather than retried forever.
    pub fn poll_once(&self) -> Result<Option<WorkItem>> {
        let source = match self
            .sources
            .iter()
            .find(|s| !s.path.as_os_str().is_empty() && s.path.is_file())
        {
            Some(source) => source,
            None => return Ok(None),
        };

        let data = fs::read(&source.path)?;
        fs::remove_file(&source.path)?;
        log::debug!("Consumed trigger {:?}", source.path);

        let item = match source.kind {
            TriggerKind::Episode => {
                WorkItem::Episode(serde_json::from_slice::<EpisodeEvent>(&data)?)
            }
            TriggerKind::Movie => WorkItem::Movie {
                event: serde_json::from_slice::<MovieEvent>(&data)?,
                uhd: false,
            },
            TriggerKind::UhdMovie => WorkItem::Movie {
                event: serde_json::from_slice::<MovieEvent>(&data)?,
                uhd: true,
            },
        };
        Ok(Some(item))
    }

    /// Poll until `shutdown` is set or the queue is closed
    pub fn run(&self, queue: &Sender<WorkItem>, shutdown: &AtomicBool, interval: Duration) {
        log::info!("Watching {} trigger files", self.sources.len());

        while !shutdown.load(Ordering::Relaxed) {
            match self.poll_once() {
                Ok(Some(item)) => {
                    log::info!("Queued {}", item);
                    if queue.send(item).is_err() {
                        log::error!("Work queue closed, stopping trigger watcher");
                        break;
                    }
                }
                Ok(None) => thread::sleep(interval),
                Err(e) => {
                    log::error!("Dropped trigger: {}", e);
                    thread::sleep(interval);
                }
            }
        }

        log::info!("Trigger watcher stopped");
    }
}
