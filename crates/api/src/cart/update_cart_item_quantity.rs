use crate::error::CartkeeperError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use cartkeeper_api_structs::update_cart_item_quantity::*;
use cartkeeper_domain::{Cart, ID};
use cartkeeper_infra::CartkeeperContext;

pub async fn update_cart_item_quantity_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CartkeeperContext>,
) -> Result<HttpResponse, CartkeeperError> {
    let body = body.0;
    let usecase = UpdateCartItemQuantityUseCase {
        user_id: body.user_id,
        item_id: body.item_id,
        quantity: body.quantity,
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(Some(cart))))
        .map_err(CartkeeperError::from)
}

/// Sets the quantity of a single line item. Unlike replacing the item
/// set, a quantity edit through this endpoint does not restart the
/// reminder sequence.
#[derive(Debug)]
pub struct UpdateCartItemQuantityUseCase {
    pub user_id: ID,
    pub item_id: ID,
    pub quantity: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    CartNotFound(ID),
    ItemNotFound(ID),
    InvalidQuantity(i64),
    StorageError,
}

impl From<UseCaseError> for CartkeeperError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CartNotFound(user_id) => Self::NotFound(format!(
                "A cart for the user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::ItemNotFound(item_id) => Self::NotFound(format!(
                "The cart item with id: {}, was not found.",
                item_id
            )),
            UseCaseError::InvalidQuantity(quantity) => Self::BadClientData(format!(
                "The quantity: {}, is not valid for a cart item.",
                quantity
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateCartItemQuantityUseCase {
    type Response = Cart;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateCartItemQuantity";

    async fn execute(&mut self, ctx: &CartkeeperContext) -> Result<Self::Response, Self::Error> {
        if self.quantity < 1 {
            return Err(UseCaseError::InvalidQuantity(self.quantity));
        }

        let mut cart = match ctx.repos.carts.find_by_user(&self.user_id).await {
            Some(cart) => cart,
            None => return Err(UseCaseError::CartNotFound(self.user_id.clone())),
        };

        let item = match cart.items.iter_mut().find(|item| item.id == self.item_id) {
            Some(item) => item,
            None => return Err(UseCaseError::ItemNotFound(self.item_id.clone())),
        };
        item.quantity = self.quantity;

        ctx.repos
            .carts
            .save(&cart)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(cart)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cartkeeper_domain::{CartItem, ReminderStage};

    fn cart_factory(user_id: &ID) -> Cart {
        let mut cart = Cart::new(user_id.clone());
        cart.items.push(CartItem {
            id: Default::default(),
            product_id: Default::default(),
            name: "Hoodie".into(),
            price: 49.99,
            quantity: 1,
            size: "M".into(),
            color: "#000000".into(),
            category: "hoodies".into(),
            image: None,
            added_at: 0,
        });
        cart
    }

    #[actix_web::main]
    #[test]
    async fn updates_quantity_without_restarting_reminders() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();
        let mut cart = cart_factory(&user_id);
        cart.reminder_stage = ReminderStage::First;
        cart.last_reminder_sent_at = Some(100);
        ctx.repos.carts.insert(&cart).await.unwrap();

        let usecase = UpdateCartItemQuantityUseCase {
            user_id: user_id.clone(),
            item_id: cart.items[0].id.clone(),
            quantity: 4,
        };
        execute(usecase, &ctx).await.unwrap();

        let stored = ctx.repos.carts.find_by_user(&user_id).await.unwrap();
        assert_eq!(stored.items[0].quantity, 4);
        assert_eq!(stored.reminder_stage, ReminderStage::First);
        assert_eq!(stored.last_reminder_sent_at, Some(100));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_cart_and_item() {
        let ctx = CartkeeperContext::create_inmemory();
        let user_id = ID::default();

        let usecase = UpdateCartItemQuantityUseCase {
            user_id: user_id.clone(),
            item_id: ID::default(),
            quantity: 2,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::CartNotFound(_))
        ));

        let cart = cart_factory(&user_id);
        ctx.repos.carts.insert(&cart).await.unwrap();

        let usecase = UpdateCartItemQuantityUseCase {
            user_id,
            item_id: ID::default(),
            quantity: 2,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::ItemNotFound(_))
        ));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_non_positive_quantity() {
        let ctx = CartkeeperContext::create_inmemory();

        let usecase = UpdateCartItemQuantityUseCase {
            user_id: ID::default(),
            item_id: ID::default(),
            quantity: 0,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidQuantity(0))
        ));
    }
}
