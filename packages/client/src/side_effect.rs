use std::sync::Arc;

use common::pet::Pet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::SideEffectFunction;
use crate::session::Session;

/// Outcome of one side-effect invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEffectReport {
    pub pet_id: Uuid,
    pub outcome: Result<(), String>,
}

/// Fires the `pet-created` function on a spawned task.
///
/// Failures never reach the caller; they are logged and sent as reports on
/// the channel returned by [`SideEffectDispatcher::new`].
#[derive(Clone)]
pub struct SideEffectDispatcher {
    function: Arc<dyn SideEffectFunction>,
    reports: mpsc::UnboundedSender<SideEffectReport>,
}

impl SideEffectDispatcher {
    pub fn new(
        function: Arc<dyn SideEffectFunction>,
    ) -> (Self, mpsc::UnboundedReceiver<SideEffectReport>) {
        let (reports, rx) = mpsc::unbounded_channel();
        (Self { function, reports }, rx)
    }

    pub fn dispatch(&self, session: Session, pet: Pet) -> JoinHandle<SideEffectReport> {
        let function = self.function.clone();
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let outcome = match function.pet_created(&session, &pet).await {
                Ok(response) => {
                    debug!(pet_id = %pet.id, message = %response.message, "Pet created webhook delivered");
                    Ok(())
                }
                Err(e) => {
                    warn!(pet_id = %pet.id, "Pet created webhook failed: {}", e);
                    Err(e.to_string())
                }
            };

            let report = SideEffectReport {
                pet_id: pet.id,
                outcome,
            };
            // Nobody listening is fine.
            let _ = reports.send(report.clone());
            report
        })
    }
}
