//! Account commands.

use anyhow::Context as _;
use civic_core::tokens::TokenPair;
use civic_core::user::{Credentials, Registration};

use crate::context::{report, Context};
use crate::output;

pub async fn login(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = username.context("--username is required")?;
    let password = password.context("--password (or CIVIC_PASSWORD) is required")?;
    Credentials::new(username.as_str(), password.as_str()).check()?;

    let user = ctx
        .session
        .login(&username, &password)
        .await
        .map_err(report)?;
    ctx.output
        .emit(&user, || format!("Logged in as {}.", user.display_name()))
}

pub fn google_url(ctx: &Context) -> anyhow::Result<()> {
    let url = ctx.client().auth().google_login_url();
    ctx.output.emit(&serde_json::json!({ "url": url }), || {
        format!(
            "Open this URL in a browser to sign in with Google:\n  {url}\n\
             Then run `civic adopt-tokens --access <access> --refresh <refresh>` \
             with the values from the callback URL."
        )
    })
}

pub async fn adopt(ctx: &Context, access: String, refresh: String) -> anyhow::Result<()> {
    let user = ctx
        .session
        .adopt_tokens(&TokenPair::new(access, refresh))
        .await
        .map_err(report)?;
    ctx.output
        .emit(&user, || format!("Logged in as {}.", user.display_name()))
}

pub async fn register(
    ctx: &Context,
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> anyhow::Result<()> {
    let input = Registration {
        username,
        email,
        password,
        first_name,
        last_name,
    };
    let user = ctx.session.register(&input).await.map_err(report)?;
    ctx.output.emit(&user, || {
        format!("Account created. Logged in as {}.", user.display_name())
    })
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    let was_signed_in = ctx.session.state().is_authenticated();
    ctx.session.logout().await;
    if ctx.output.is_json() {
        println!("{}", serde_json::json!({ "logged_out": was_signed_in }));
    } else if was_signed_in {
        println!("Logged out.");
    } else {
        println!("Not logged in; cleared any stored tokens.");
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let user = ctx.require_login()?;
    ctx.output.emit(&user, || output::user(&user))
}
