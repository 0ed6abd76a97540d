//! `chatlog stats` command.

use crate::state::AppState;

/// Print the aggregation for everyone or one user as pretty JSON.
pub async fn print_stats(state: &AppState, user: Option<&str>) -> anyhow::Result<()> {
    let stats = state.conversation_service.stats(user).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
