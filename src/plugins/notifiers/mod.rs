// Notifier plugin implementations
pub mod line;
pub mod discord;
pub mod console;

pub use line::LineNotifier;
pub use discord::DiscordNotifier;
pub use console::ConsoleNotifier;
