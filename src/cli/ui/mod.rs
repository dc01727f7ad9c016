pub mod formatting;
pub mod line_editor;
pub mod menu;
pub mod prompts;
pub mod terminal;
pub mod test_mode;

pub use line_editor::{read_line, InputSession};
pub use menu::{run_menu, Interaction, LoopControl, Menu, MenuEntry, MenuResult};
pub use prompts::{confirm, PromptSpec, Prompted};
pub use terminal::{CrosstermTerminal, Key, Terminal};
pub use test_mode::{ScriptedTerminal, Transcript};
