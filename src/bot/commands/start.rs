use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use crate::bot::commands::Command;
use crate::bot::handlers::{BotContext, HandlerResult};
use crate::bot::keyboards::{self, Screen};
use crate::database::models::User;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_database_error;
use crate::utils::markdown::{bold, escape_markdown};

pub fn welcome_text(first_name: &str) -> String {
    format!(
        "👋 {}\n\n{}",
        bold(&format!("Добро пожаловать, {first_name}!")),
        escape_markdown(
            "Я помогаю следить за состоянием аудиторий и назначать инженеров на мероприятия.\n\n\
             Нажмите кнопку ниже, чтобы начать."
        )
    )
}

pub fn main_menu_screen() -> Screen {
    Screen::new(
        format!(
            "🏠 {}\n\n{}",
            bold("Главное меню"),
            escape_markdown("Выберите раздел:")
        ),
        keyboards::main_menu_keyboard(),
    )
}

pub fn help_screen() -> Screen {
    let text = format!(
        "❓ {}\n\n{}\n\n{}\n{}",
        bold("Справка"),
        escape_markdown(&Command::descriptions().to_string()),
        escape_markdown("🟢 green: всё работает\n🟡 yellow: есть проблемы\n🔴 red: не работает"),
        escape_markdown("\nДля жёлтого и красного статуса бот попросит комментарий. /cancel отменяет ввод."),
    );
    Screen::new(text, keyboards::back_keyboard())
}

/// Known users land on the menu; newcomers (no reports yet) get a welcome
/// with a launch button first.
pub async fn handle_start(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let first_time = match User::has_reported(&ctx.db.pool, user_id).await {
        Ok(reported) => !reported,
        Err(e) => {
            log_database_error("SELECT", "status_log", &e.to_string(), Some(&user_id.to_string()));
            false
        }
    };

    if first_time {
        feedback
            .send_markdown(
                welcome_text(&user.first_name),
                Some(keyboards::first_start_keyboard().into()),
            )
            .await?;
    } else {
        send_main_menu(&feedback).await?;
    }
    Ok(())
}

/// Installs the reply keyboard and shows the inline main menu.
pub async fn send_main_menu(feedback: &CommandFeedback) -> HandlerResult {
    feedback
        .send_markdown(
            escape_markdown("Меню всегда доступно внизу экрана 👇"),
            Some(keyboards::persistent_menu().into()),
        )
        .await?;
    let screen = main_menu_screen();
    feedback.send_markdown(screen.text, Some(screen.keyboard.into())).await?;
    Ok(())
}

pub async fn handle_help(bot: Bot, msg: Message) -> HandlerResult {
    let screen = help_screen();
    CommandFeedback::for_message(bot, &msg)
        .send_markdown(screen.text, Some(screen.keyboard.into()))
        .await?;
    Ok(())
}

pub async fn handle_cancel(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let feedback = CommandFeedback::for_message(bot, &msg);
    let Some(user) = msg.from() else {
        return Ok(());
    };

    if ctx.sessions.cancel(user.id.0 as i64).await? {
        feedback.success("Ввод комментария отменён").await?;
    } else {
        feedback.info("Нечего отменять").await?;
    }
    Ok(())
}
