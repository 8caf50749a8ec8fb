use crate::error::CartkeeperError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use cartkeeper_api_structs::delete_cart_item::*;
use cartkeeper_domain::{Cart, ID};
use cartkeeper_infra::CartkeeperContext;

pub async fn delete_cart_item_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CartkeeperContext>,
) -> Result<HttpResponse, CartkeeperError> {
    let body = body.0;
    let usecase = DeleteCartItemUseCase {
        user_id: body.user_id,
        item_id: body.item_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(cart)))
        .map_err(CartkeeperError::from)
}

/// Removes a single line item. Removal is a material change to the
/// item set, so the reminder sequence restarts. Removing the last
/// item deletes the cart.
#[derive(Debug)]
pub struct DeleteCartItemUseCase {
    pub user_id: ID,
    pub item_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    CartNotFound(ID),
    ItemNotFound(ID),
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
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteCartItemUseCase {
    type Response = Option<Cart>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteCartItem";

    async fn execute(&mut self, ctx: &CartkeeperContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut cart = match ctx.repos.carts.find_by_user(&self.user_id).await {
            Some(cart) => cart,
            None => return Err(UseCaseError::CartNotFound(self.user_id.clone())),
        };

        if !cart.remove_item(&self.item_id, now) {
            return Err(UseCaseError::ItemNotFound(self.item_id.clone()));
        }

        if cart.items.is_empty() {
            ctx.repos.carts.delete_by_user(&self.user_id).await;
            return Ok(None);
        }

        ctx.repos
            .carts
            .save(&cart)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(Some(cart))
    }
}
