use std::sync::Arc;

use parking_lot::Mutex;

use super::{Completion, HttpTransport, Job, Transport, Work};
use crate::bulk;
use crate::error::AppError;

/// Completions waiting for the UI thread. Shared with every running task.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    completions: Arc<Mutex<Vec<Completion>>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, completion: Completion) {
        self.completions.lock().push(completion);
    }

    /// Takes every completion in arrival order.
    pub fn drain(&self) -> Vec<Completion> {
        std::mem::take(&mut *self.completions.lock())
    }
}

/// Runs queued [`Work`] in the background and collects the outcomes in an
/// [`Inbox`]. A repaint is requested after every completion so the UI picks
/// it up without waiting for input.
pub struct TaskExecutor {
    transport: HttpTransport,
    inbox: Inbox,
    ctx: egui::Context,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl TaskExecutor {
    pub fn new(transport: HttpTransport, ctx: egui::Context) -> Result<Self, AppError> {
        #[cfg(not(target_arch = "wasm32"))]
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("icon-manager-io")
            .enable_all()
            .build()?;

        Ok(Self {
            transport,
            inbox: Inbox::new(),
            ctx,
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
        })
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn dispatch_all(&self, work: impl IntoIterator<Item = Work>) {
        for item in work {
            self.dispatch(item);
        }
    }

    pub fn dispatch(&self, work: Work) {
        let transport = self.transport.clone();
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();

        let task = async move {
            let completion = match work {
                Work::Single(Job { tag, request }) => Completion::Single {
                    tag,
                    result: transport.send(request).await,
                },
                Work::Batch(plan) => {
                    let batch = bulk::fan_out(&transport, plan);
                    Completion::Batch(batch.join().await)
                }
            };
            inbox.push(completion);
            ctx.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.runtime.spawn(task);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);
    }

    pub fn drain(&self) -> Vec<Completion> {
        self.inbox.drain()
    }
}
