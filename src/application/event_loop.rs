use super::SitacService;
use crate::common::{ApplicationError, ApplicationResult, EnvelopeSource};
use tracing::{debug, error, info};

/// Pull envelopes in arrival order and apply each one to completion.
///
/// Returns the number of envelopes applied once the source is exhausted. The
/// first failure stops the loop; domain failures have already been reported
/// to the operator by the service.
pub async fn run_event_loop<S>(source: &mut S, service: &mut SitacService) -> ApplicationResult<u64>
where
    S: EnvelopeSource + ?Sized,
{
    let mut applied = 0u64;
    loop {
        let envelope = match source.next_envelope().await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => break,
            Err(e) => {
                error!("Event channel failed: {}", e);
                service.notifier().error(&format!("Event channel failed: {}", e));
                return Err(ApplicationError::Channel(e));
            }
        };

        debug!("Applying {} envelope", envelope.event_type);
        service.handle_envelope(&envelope)?;
        applied += 1;
    }

    info!("Event channel closed after {} envelope(s)", applied);
    Ok(applied)
}
