//! Numbered menus with a `back` sentinel.
//!
//! A menu is rebuilt from its context on every render, so entries can list
//! live data. Nested menus are plain nested calls to [`run_menu`]; `back`
//! pops exactly one level.

use std::io;

use crate::errors::CliError;

use super::formatting;
use super::terminal::Terminal;

pub const BACK_TOKEN: &str = "back";
pub const INVALID_CHOICE: &str = "Invalid choice";
pub const PRESS_ANY_KEY: &str = "Press any key to continue...";

/// Anything that owns the terminal a menu draws on.
pub trait Interaction {
    fn terminal(&mut self) -> &mut dyn Terminal;
}

/// Whether the enclosing menus keep running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type MenuResult = Result<LoopControl, CliError>;

type MenuAction<C> = Box<dyn Fn(&mut C) -> MenuResult>;

pub struct MenuEntry<C> {
    pub label: String,
    action: MenuAction<C>,
}

impl<C> MenuEntry<C> {
    pub fn new(label: impl Into<String>, action: impl Fn(&mut C) -> MenuResult + 'static) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }
}

pub struct Menu<C> {
    pub title: String,
    pub context: Vec<String>,
    pub entries: Vec<MenuEntry<C>>,
}

impl<C> Menu<C> {
    pub fn new(title: impl Into<String>, entries: Vec<MenuEntry<C>>) -> Self {
        Self {
            title: title.into(),
            context: Vec::new(),
            entries,
        }
    }

    /// Lines printed between the header and the numbered entries.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

/// Render, read, dispatch until the user types `back`.
///
/// Returns [`LoopControl::Exit`] when an action asked the whole program to
/// stop, so callers can unwind every level. End of input counts as `back`.
pub fn run_menu<C: Interaction>(ctx: &mut C, mut build: impl FnMut(&C) -> Menu<C>) -> MenuResult {
    loop {
        let menu = build(ctx);
        render(ctx.terminal(), &menu)?;

        let Some(choice) = read_choice(ctx.terminal())? else {
            return Ok(LoopControl::Continue);
        };
        if is_back(&choice) {
            return Ok(LoopControl::Continue);
        }

        let Some(index) = parse_choice(&choice, menu.entries.len()) else {
            ctx.terminal()
                .write(&format!("{}\n", formatting::error_text(INVALID_CHOICE)))?;
            press_any_key(ctx.terminal())?;
            continue;
        };

        let entry = &menu.entries[index - 1];
        tracing::debug!(menu = %menu.title, entry = %entry.label, "menu dispatch");
        if (entry.action)(ctx)? == LoopControl::Exit {
            return Ok(LoopControl::Exit);
        }
        press_any_key(ctx.terminal())?;
    }
}

pub fn render<C>(term: &mut dyn Terminal, menu: &Menu<C>) -> io::Result<()> {
    term.clear_screen()?;
    term.write(&format!("{}\n\n", formatting::header_text(&menu.title)))?;
    if !menu.context.is_empty() {
        for line in &menu.context {
            term.write(&format!("{line}\n"))?;
        }
        term.write("\n")?;
    }
    for (index, entry) in menu.entries.iter().enumerate() {
        term.write(&format!("{}. {}\n", index + 1, entry.label))?;
    }
    term.write(&format!("[{BACK_TOKEN}]. Back\n"))
}

/// Line-buffered read of a menu choice.
pub fn read_choice(term: &mut dyn Terminal) -> io::Result<Option<String>> {
    term.write("\nChoice: ")?;
    term.read_line()
}

pub fn is_back(choice: &str) -> bool {
    choice.trim().eq_ignore_ascii_case(BACK_TOKEN)
}

/// 1-based position when `choice` is a number in `1..=len`.
pub fn parse_choice(choice: &str, len: usize) -> Option<usize> {
    let value = choice.trim().parse::<usize>().ok()?;
    (1..=len).contains(&value).then_some(value)
}

pub fn press_any_key(term: &mut dyn Terminal) -> io::Result<()> {
    term.write(&format!("\n{PRESS_ANY_KEY}"))?;
    term.wait_for_key()?;
    term.write("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ui::test_mode::{ScriptedTerminal, Transcript};

    struct Harness {
        term: ScriptedTerminal,
        calls: Vec<&'static str>,
    }

    impl Harness {
        fn new(script: &str) -> (Self, Transcript) {
            let term = ScriptedTerminal::from_script(script);
            let transcript = term.transcript();
            let harness = Self {
                term,
                calls: Vec::new(),
            };
            (harness, transcript)
        }
    }

    impl Interaction for Harness {
        fn terminal(&mut self) -> &mut dyn Terminal {
            &mut self.term
        }
    }

    fn record(name: &'static str) -> MenuEntry<Harness> {
        MenuEntry::new(name, move |h: &mut Harness| {
            h.calls.push(name);
            Ok(LoopControl::Continue)
        })
    }

    fn list_add_edit(_: &Harness) -> Menu<Harness> {
        Menu::new(
            "Book menu",
            vec![record("List"), record("Add"), record("Edit")],
        )
    }

    #[test]
    fn numeric_choice_dispatches_once_then_redraws() {
        let (mut h, transcript) = Harness::new("2<ENTER>back<ENTER>");
        let control = run_menu(&mut h, list_add_edit).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(h.calls, vec!["Add"]);
        assert_eq!(transcript.count("=== Book menu ==="), 2);
        assert_eq!(transcript.confirmations(), 1);
    }

    #[test]
    fn back_in_any_case_exits_without_dispatch() {
        for token in ["back", "BACK", " Back "] {
            let (mut h, transcript) = Harness::new(&format!("{token}<ENTER>"));
            run_menu(&mut h, list_add_edit).unwrap();
            assert!(h.calls.is_empty());
            assert_eq!(transcript.count("=== Book menu ==="), 1);
        }
    }

    #[test]
    fn out_of_range_or_garbage_shows_invalid_choice() {
        let (mut h, transcript) = Harness::new("0<ENTER>4<ENTER>two<ENTER>-1<ENTER>back<ENTER>");
        run_menu(&mut h, list_add_edit).unwrap();
        assert!(h.calls.is_empty());
        assert_eq!(transcript.count(INVALID_CHOICE), 4);
        assert_eq!(transcript.confirmations(), 4);
        assert_eq!(transcript.count("=== Book menu ==="), 5);
    }

    #[test]
    fn back_works_with_no_entries() {
        let (mut h, transcript) = Harness::new("1<ENTER>back<ENTER>");
        run_menu(&mut h, |_: &Harness| Menu::new("Stores", Vec::new())).unwrap();
        assert_eq!(transcript.count(INVALID_CHOICE), 1);
        assert!(transcript.output().contains("[back]. Back"));
    }

    #[test]
    fn entries_are_numbered_from_one() {
        let (mut h, transcript) = Harness::new("back<ENTER>");
        run_menu(&mut h, list_add_edit).unwrap();
        let output = transcript.output();
        assert!(output.contains("1. List\n2. Add\n3. Edit\n[back]. Back\n"));
    }

    #[test]
    fn menu_is_rebuilt_from_context_each_render() {
        let (mut h, transcript) = Harness::new("1<ENTER>1<ENTER>back<ENTER>");
        run_menu(&mut h, |h: &Harness| {
            let label = format!("Called {} times", h.calls.len());
            Menu::new("Live", vec![record("Count")]).with_context(vec![label])
        })
        .unwrap();
        let output = transcript.output();
        assert!(output.contains("Called 0 times"));
        assert!(output.contains("Called 2 times"));
    }

    #[test]
    fn exit_from_nested_action_unwinds_all_levels() {
        let (mut h, transcript) = Harness::new("1<ENTER>1<ENTER>");
        let control = run_menu(&mut h, |_: &Harness| {
            Menu::new(
                "Outer",
                vec![MenuEntry::new("Inner", |h: &mut Harness| {
                    run_menu(h, |_: &Harness| {
                        Menu::new(
                            "Inner",
                            vec![MenuEntry::new("Quit", |_: &mut Harness| Ok(LoopControl::Exit))],
                        )
                    })
                })],
            )
        })
        .unwrap();
        assert_eq!(control, LoopControl::Exit);
        assert_eq!(transcript.confirmations(), 0);
    }

    #[test]
    fn back_in_nested_menu_returns_to_parent() {
        let (mut h, transcript) = Harness::new("1<ENTER>back<ENTER>back<ENTER>");
        run_menu(&mut h, |_: &Harness| {
            Menu::new(
                "Outer",
                vec![MenuEntry::new("Inner", |h: &mut Harness| {
                    run_menu(h, list_add_edit)
                })],
            )
        })
        .unwrap();
        assert_eq!(transcript.count("=== Outer ==="), 2);
        assert_eq!(transcript.count("=== Book menu ==="), 1);
    }

    #[test]
    fn leaving_a_nested_menu_waits_for_a_key() {
        let (mut h, transcript) = Harness::new("1<ENTER>back<ENTER>back<ENTER>");
        run_menu(&mut h, |_: &Harness| {
            Menu::new(
                "Outer",
                vec![MenuEntry::new("Inner", |h: &mut Harness| {
                    run_menu(h, list_add_edit)
                })],
            )
        })
        .unwrap();
        assert_eq!(transcript.confirmations(), 1);
        assert_eq!(transcript.count("=== Outer ==="), 2);
    }

    #[test]
    fn end_of_input_acts_as_back() {
        let (mut h, _transcript) = Harness::new("");
        assert_eq!(
            run_menu(&mut h, list_add_edit).unwrap(),
            LoopControl::Continue
        );
    }

    #[test]
    fn parse_choice_bounds() {
        assert_eq!(parse_choice("1", 3), Some(1));
        assert_eq!(parse_choice(" 3 ", 3), Some(3));
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("1", 0), None);
    }
}
