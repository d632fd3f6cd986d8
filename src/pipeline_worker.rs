// Runs a split on a background thread and reports over a channel

use crossbeam_channel::Sender;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::error::{Result, SplitError};
use crate::event::SplitMsg;
use crate::model::CursorArtifact;
use crate::pipeline::SplitOptions;
use crate::pipeline::converter::process_with_progress;

pub struct SplitWorker {
    tx: Sender<SplitMsg>,
    /// Flag of the most recently started run.
    cancel: Mutex<Arc<AtomicBool>>,
}

impl SplitWorker {
    pub fn new(tx: Sender<SplitMsg>) -> Self {
        Self {
            tx,
            cancel: Mutex::new(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Abandons the current run: tiles that have not started are skipped,
    /// running ones finish. Later runs start with a fresh flag.
    pub fn cancel(&self) {
        if let Ok(flag) = self.cancel.lock() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    fn fresh_cancel_flag(&self) -> Arc<AtomicBool> {
        let flag = Arc::new(AtomicBool::new(false));
        match self.cancel.lock() {
            Ok(mut current) => *current = Arc::clone(&flag),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&flag),
        }
        flag
    }

    pub fn start_split_file(&self, input: PathBuf, options: SplitOptions) -> thread::JoinHandle<()> {
        let tx = self.tx.clone();
        let options = options.with_cancel_flag(self.fresh_cancel_flag());

        thread::spawn(move || {
            let _ = tx.send(SplitMsg::LogMessage(format!("Decoding {}", input.display())));
            let result = image::open(&input)
                .map_err(|source| SplitError::Decode {
                    path: input.clone(),
                    source,
                })
                .and_then(|img| Self::run(&img.to_rgba8(), &options, &tx));
            Self::finish(result, &tx);
        })
    }

    pub fn start_split_image(&self, source: RgbaImage, options: SplitOptions) -> thread::JoinHandle<()> {
        let tx = self.tx.clone();
        let options = options.with_cancel_flag(self.fresh_cancel_flag());

        thread::spawn(move || {
            let result = Self::run(&source, &options, &tx);
            Self::finish(result, &tx);
        })
    }

    fn run(
        source: &RgbaImage,
        options: &SplitOptions,
        tx: &Sender<SplitMsg>,
    ) -> Result<Vec<CursorArtifact>> {
        // progress(0, total) arrives once the grid has been sliced
        process_with_progress(source, options, |done, total| {
            let msg = if done == 0 {
                SplitMsg::Started(total)
            } else {
                SplitMsg::Progress(done, total)
            };
            let _ = tx.send(msg);
        })
    }

    fn finish(result: Result<Vec<CursorArtifact>>, tx: &Sender<SplitMsg>) {
        match result {
            Ok(artifacts) => {
                let _ = tx.send(SplitMsg::LogMessage(format!(
                    "Encoded {} cursors",
                    artifacts.len()
                )));
                let _ = tx.send(SplitMsg::Completed(artifacts));
            }
            Err(e) => {
                log::error!("Split failed: {}", e);
                let _ = tx.send(SplitMsg::Failed(e.to_string()));
            }
        }
    }
}
