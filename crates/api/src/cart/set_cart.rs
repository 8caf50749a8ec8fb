use crate::error::CartkeeperError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use cartkeeper_api_structs::set_cart::*;
use cartkeeper_domain::{Cart, CartItemDraft, ID};
use cartkeeper_infra::CartkeeperContext;

pub async fn set_cart_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CartkeeperContext>,
) -> Result<HttpResponse, CartkeeperError> {
    let body = body.0;
    let usecase = SetCartUseCase {
        user_id: body.user_id,
        items: body.items.into_iter().map(|i| i.into_draft()).collect(),
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(cart)))
        .map_err(CartkeeperError::from)
}

/// Replaces the item set of the user's cart. An empty item list
/// deletes the cart. A materially changed item set restarts the
/// abandoned cart reminder sequence, an unchanged one leaves it
/// untouched.
#[derive(Debug)]
pub struct SetCartUseCase {
    pub user_id: ID,
    pub items: Vec<CartItemDraft>,
}

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

#[async_trait::async_trait(?Send)]
impl UseCase for SetCartUseCase {
    type Response = Option<Cart>;

    type Error = UseCaseError;

    const NAME: &'static str = "SetCart";

    async fn execute(&mut self, ctx: &CartkeeperContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let drafts = std::mem::take(&mut self.items);

        if drafts.is_empty() {
            ctx.repos.carts.delete_by_user(&self.user_id).await;
            return Ok(None);
        }

        match ctx.repos.carts.find_by_user(&self.user_id).await {
            Some(mut cart) => {
                let changed = cart.apply_items(drafts, now);
                if changed {
                    ctx.repos
                        .carts
                        .save(&cart)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                }
                Ok(Some(cart))
            }
            None => {
                let mut cart = Cart::new(self.user_id.clone());
                cart.apply_items(drafts, now);
                ctx.repos
                    .carts
                    .insert(&cart)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                Ok(Some(cart))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cartkeeper_domain::ReminderStage;

    fn draft_factory(product_id: &ID, quantity: i64) -> CartItemDraft {
        CartItemDraft {
            product_id: product_id.clone(),
            name: "Hoodie".into(),
            price: 49.99,
            quantity,
            size: "M".into(),
            color: "#000000".into(),
            category: "hoodies".into(),
            image: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_cart_on_first_save() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&ID::default(), 1)],
        };
        let res = execute(usecase, &ctx).await.unwrap();

        let cart = res.expect("Cart to be created");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.reminder_stage, ReminderStage::NotSent);
        assert!(ctx.repos.carts.find_by_user(&user_id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn changed_item_set_restarts_reminder_sequence() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();
        let product_id = ID::default();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&product_id, 1)],
        };
        execute(usecase, &ctx).await.unwrap();

        // Simulate the sweep having sent two reminders
        let mut cart = ctx.repos.carts.find_by_user(&user_id).await.unwrap();
        cart.reminder_stage = ReminderStage::Second;
        cart.last_reminder_sent_at = Some(100);
        ctx.repos.carts.save(&cart).await.unwrap();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&product_id, 3)],
        };
        execute(usecase, &ctx).await.unwrap();

        let cart = ctx.repos.carts.find_by_user(&user_id).await.unwrap();
        assert_eq!(cart.reminder_stage, ReminderStage::NotSent);
        assert_eq!(cart.last_reminder_sent_at, None);
    }

    #[actix_web::main]
    #[test]
    async fn unchanged_item_set_keeps_reminder_sequence() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();
        let product_id = ID::default();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&product_id, 1)],
        };
        execute(usecase, &ctx).await.unwrap();

        let mut cart = ctx.repos.carts.find_by_user(&user_id).await.unwrap();
        cart.reminder_stage = ReminderStage::First;
        cart.last_reminder_sent_at = Some(100);
        ctx.repos.carts.save(&cart).await.unwrap();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&product_id, 1)],
        };
        execute(usecase, &ctx).await.unwrap();

        let cart = ctx.repos.carts.find_by_user(&user_id).await.unwrap();
        assert_eq!(cart.reminder_stage, ReminderStage::First);
        assert_eq!(cart.last_reminder_sent_at, Some(100));
    }

    #[actix_web::main]
    #[test]
    async fn empty_item_set_deletes_cart() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![draft_factory(&ID::default(), 1)],
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = SetCartUseCase {
            user_id: user_id.clone(),
            items: vec![],
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert!(res.is_none());
        assert!(ctx.repos.carts.find_by_user(&user_id).await.is_none());
    }
}
