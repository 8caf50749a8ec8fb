use crate::cart::send_cart_reminders::SendCartRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use cartkeeper_infra::CartkeeperContext;
use std::time::Duration;
use tracing::info;

/// Spawns the periodic abandoned cart sweep. Each run is awaited
/// before the next tick so a slow smtp server cannot stack sweeps
/// within one process, overlapping processes are handled by the
/// conditional stage writes in the cart repo.
pub fn start_cart_reminders_job(ctx: CartkeeperContext) {
    let sweep_interval = Duration::from_secs(ctx.config.reminder_sweep_interval_secs);
    actix_web::rt::spawn(async move {
        let mut sweep_interval = interval(sweep_interval);
        loop {
            sweep_interval.tick().await;

            match execute(SendCartRemindersUseCase, &ctx).await {
                Ok(summary) if summary.reminders_sent > 0 => {
                    info!(
                        "Cart reminder sweep sent {} reminders across {} candidate carts",
                        summary.reminders_sent, summary.candidates
                    );
                }
                // Nothing due, and query failures are already logged by
                // the usecase
                _ => (),
            }
        }
    });
}
