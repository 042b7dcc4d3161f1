use axum::extract::FromRef;
use axum_helpers::JwtAuth;
use messaging::RpcClient;

/// Shared gateway state: the broker client for service calls and the token
/// verifier for authenticating requests locally.
#[derive(Clone)]
pub struct AppState {
    pub rpc: RpcClient,
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(rpc: RpcClient, jwt: JwtAuth) -> Self {
        Self { rpc, jwt }
    }
}

// Lets the AuthUser extractor pull the verifier out of the app state.
impl FromRef<AppState> for JwtAuth {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
