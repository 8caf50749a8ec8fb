use crate::error::CartkeeperError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use cartkeeper_api_structs::get_cart::*;
use cartkeeper_domain::{Cart, ID};
use cartkeeper_infra::CartkeeperContext;

pub async fn get_cart_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<CartkeeperContext>,
) -> Result<HttpResponse, CartkeeperError> {
    let usecase = GetCartUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|cart| HttpResponse::Ok().json(APIResponse::new(cart)))
        .map_err(CartkeeperError::from)
}

#[derive(Debug)]
pub struct GetCartUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CartkeeperError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCartUseCase {
    type Response = Option<Cart>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetCart";

    async fn execute(&mut self, ctx: &CartkeeperContext) -> Result<Self::Response, Self::Error> {
        // A user without a cart is not an error, clients render an
        // empty cart
        Ok(ctx.repos.carts.find_by_user(&self.user_id).await)
    }
}
