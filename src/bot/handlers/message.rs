use teloxide::prelude::*;
use crate::bot::commands::{assign, start, status, today, Command};
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::utils::logging::{log_command_error, log_command_start};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;
    let name = cmd.name();
    let username = user.username.clone().unwrap_or_else(|| user.full_name());

    let details = match &cmd {
        Command::Status(args) => Some(args.as_str()),
        _ => None,
    };
    log_command_start(name, &username, user_id, chat_id, details);

    ctx.touch_user(user).await;

    // Any other command abandons a half-finished status change.
    if cmd != Command::Cancel {
        ctx.sessions.cancel(user_id).await?;
    }

    let result = match cmd {
        Command::Start => start::handle_start(bot, msg, &ctx).await,
        Command::Help => start::handle_help(bot, msg).await,
        Command::Status(args) => status::handle_status(bot, msg, args, &ctx).await,
        Command::Today => today::handle_today(bot, msg, &ctx).await,
        Command::Assign => assign::handle_assign(bot, msg, &ctx).await,
        Command::Cancel => start::handle_cancel(bot, msg, &ctx).await,
    };

    if let Err(e) = &result {
        log_command_error(name, user_id, chat_id, &e.to_string());
    }
    result
}
