//! Back-office session commands.

use crate::context::AppContext;

/// Log in and persist the session token.
///
/// # Errors
///
/// Returns an error with the server's message if login fails.
pub(crate) async fn run_login(
    ctx: &AppContext,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let snapshot = ctx
        .auth
        .login(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
    let who = snapshot
        .user
        .and_then(|u| u.username)
        .unwrap_or_else(|| username.trim().to_string());
    println!("logged in as {who}");
    Ok(())
}

pub(crate) fn run_logout(ctx: &AppContext) {
    ctx.auth.logout();
    println!("logged out");
}

/// Verify the stored token with the server.
///
/// # Errors
///
/// Returns an error when there is no valid session.
pub(crate) async fn run_verify(ctx: &AppContext) -> anyhow::Result<()> {
    let outcome = ctx.auth.init().await;
    if !outcome.is_authenticated {
        let reason = ctx
            .auth
            .snapshot()
            .error
            .unwrap_or_else(|| "no stored session".to_string());
        anyhow::bail!("not authenticated: {reason}");
    }
    let user = outcome.user.unwrap_or_default();
    println!(
        "authenticated as {} (role {})",
        user.username.as_deref().unwrap_or("unknown"),
        user.role.as_deref().unwrap_or("unknown")
    );
    Ok(())
}
