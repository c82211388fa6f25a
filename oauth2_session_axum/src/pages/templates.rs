use askama::Template;

#[derive(Template)]
#[template(path = "home.j2", escape = "html")]
pub(crate) struct HomeTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}

#[derive(Template)]
#[template(path = "about.j2", escape = "html")]
pub(crate) struct AboutTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}

#[derive(Template)]
#[template(path = "protected.j2", escape = "html")]
pub(crate) struct ProtectedTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
    pub(crate) userinfo: Vec<(String, String)>,
    pub(crate) token_type: String,
    pub(crate) expiry: String,
    pub(crate) has_refresh_token: bool,
}

#[derive(Template)]
#[template(path = "401.j2", escape = "html")]
pub(crate) struct UnauthorizedTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}

#[derive(Template)]
#[template(path = "404.j2", escape = "html")]
pub(crate) struct NotFoundTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}

#[derive(Template)]
#[template(path = "500.j2", escape = "html")]
pub(crate) struct ServerErrorTemplate {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}
