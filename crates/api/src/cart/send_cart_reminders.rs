use crate::error::CartkeeperError;
use crate::shared::usecase::UseCase;
use cartkeeper_domain::{Cart, FIRST_REMINDER_DELAY_MILLIS};
use cartkeeper_infra::CartkeeperContext;
use tracing::{error, warn};

/// One sweep over carts with stale items, sending every reminder
/// that has become due. Invoked on an interval by the job scheduler.
///
/// Per cart the sweep claims the next stage with a conditional write
/// before emailing, so two processes sweeping the same store send each
/// stage at most once. A claim whose email fails to send is rolled
/// back and retried on a later sweep.
#[derive(Debug)]
pub struct SendCartRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CartkeeperError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct SweepSummary {
    pub candidates: usize,
    pub reminders_sent: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendCartRemindersUseCase {
    type Response = SweepSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendCartReminders";

    async fn execute(&mut self, ctx: &CartkeeperContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        // Carts whose oldest item is younger than the first threshold
        // cannot have anything due yet
        let carts = ctx
            .repos
            .carts
            .find_with_items_older_than(now - FIRST_REMINDER_DELAY_MILLIS)
            .await
            .map_err(|e| {
                error!("Unable to query carts with stale items. Error: {:?}", e);
                UseCaseError::StorageError
            })?;
        let candidates = carts.len();

        let mut reminders_sent = 0;
        for cart in carts {
            let cart_id = cart.id.clone();
            match send_due_reminder(cart, now, ctx).await {
                Ok(true) => reminders_sent += 1,
                Ok(false) => (),
                // One broken cart must not starve the rest of the sweep
                Err(e) => error!(
                    "Unable to send reminder for cart with id: {}. Error: {:?}",
                    cart_id, e
                ),
            }
        }

        Ok(SweepSummary {
            candidates,
            reminders_sent,
        })
    }
}

async fn send_due_reminder(
    cart: Cart,
    now: i64,
    ctx: &CartkeeperContext,
) -> anyhow::Result<bool> {
    let next = match cart.due_reminder(now) {
        Some(next) => next,
        None => return Ok(false),
    };

    // Claim the stage before sending. Losing the claim means another
    // sweep got there first, which is not an error.
    let claimed = ctx
        .repos
        .carts
        .advance_reminder_stage(&cart.id, cart.reminder_stage, next, Some(now))
        .await?;
    if !claimed {
        return Ok(false);
    }

    let customer = match ctx.repos.customers.find(&cart.user_id).await {
        Some(customer) => customer,
        None => {
            // The claim stands so the sequence keeps moving, there is
            // simply nobody to email
            warn!(
                "No customer found for cart with id: {}, skipping reminder email",
                cart.id
            );
            return Ok(false);
        }
    };

    if let Err(send_err) = ctx.notifier.send_reminder(&customer, &cart.items, next).await {
        let rolled_back = ctx
            .repos
            .carts
            .advance_reminder_stage(&cart.id, next, cart.reminder_stage, cart.last_reminder_sent_at)
            .await;
        match rolled_back {
            Ok(true) => (),
            Ok(false) => error!(
                "Claimed reminder stage for cart with id: {} was changed before rollback",
                cart.id
            ),
            Err(e) => error!(
                "Unable to roll back claimed reminder stage for cart with id: {}. Error: {:?}",
                cart.id, e
            ),
        }
        return Err(send_err);
    }

    Ok(true)
}
