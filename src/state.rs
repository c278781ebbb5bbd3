use crate::auth::{Credentials, TokenIssuer};
use crate::service::{CarService, EngineService};

#[derive(Clone)]
pub struct AppState {
    pub cars: CarService,
    pub engines: EngineService,
    pub tokens: TokenIssuer,
    pub credentials: Credentials,
}
