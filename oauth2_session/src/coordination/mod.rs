mod errors;
mod oauth2;

#[cfg(test)]
mod test_utils;

pub use errors::FlowError;
pub use oauth2::{
    FlowRedirect, HOME_PATH, LOGIN_RENEW_PATH, PROTECTED_PATH, ProtectedResource,
    access_protected_resource, handle_callback, initiate_login, logout, renew_login,
};
