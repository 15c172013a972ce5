pub mod assign;
pub mod start;
pub mod status;
pub mod today;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "открыть главное меню")]
    Start,
    #[command(description = "показать справку")]
    Help,
    #[command(description = "обновить статус: /status <аудитория> <green|yellow|red> [комментарий]")]
    Status(String),
    #[command(description = "мероприятия на сегодня")]
    Today,
    #[command(description = "назначить сотрудника на мероприятие")]
    Assign,
    #[command(description = "отменить ввод комментария")]
    Cancel,
}

impl Command {
    /// Name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Status(_) => "status",
            Command::Today => "today",
            Command::Assign => "assign",
            Command::Cancel => "cancel",
        }
    }
}
