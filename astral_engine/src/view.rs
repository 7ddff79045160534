//! View module.
//! Rather than printing to the console from each handler, handlers push [`ViewItem`]s
//! which are organized and displayed at the end of the turn.

use colored::Colorize;
use log::info;
use textwrap::{fill, termwidth};
use variantly::Variantly;

use crate::style::{GameStyle, indented_block, normal_block};

/// View aggregates information to be displayed on each pass through the REPL and then organizes
/// and displays the result.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub items: Vec<ViewItem>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// True if any pending item satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&ViewItem) -> bool) -> bool {
        self.items.iter().any(pred)
    }

    /// Drop everything queued for the current frame.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Compose and display all message contents in the current frame / turn.
    pub fn flush(&mut self) {
        let width = termwidth();
        let mut items = std::mem::take(&mut self.items);
        // stable sort keeps push order within a section
        items.sort_by_key(ViewItem::section);

        let mut current = None;
        for item in &items {
            let section = item.section();
            if current != Some(section) {
                current = Some(section);
                if let Some(label) = section.label() {
                    println!("{:.>width$}\n", label.section_style());
                }
            }
            item.render();
        }
        info!("view flushed {} items", items.len());
    }
}

/// Subsections of the output, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    /// Transitional text between turns.
    Transition,
    /// Room description, exits and visible objects.
    Environment,
    /// Direct results of the player's command.
    DirectResult,
    /// Meta/game-system feedback (help, score, developer output).
    System,
}

impl Section {
    fn label(self) -> Option<&'static str> {
        match self {
            Section::Transition => None,
            Section::Environment => Some("scene"),
            Section::DirectResult => Some("results"),
            Section::System => Some("game"),
        }
    }
}

/// Row data for the exit listing portion of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitLine {
    pub direction: String,
    pub destination: String,
    pub exit_locked: bool,
    pub dest_visited: bool,
}

/// One entry of the help listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub command: String,
    pub description: String,
}

/// `ViewItems` are each of the various types of information / messages that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    EngineMessage(String),
    Error(String),
    Help(Vec<HelpLine>),
    Inventory(Vec<String>),
    ObjectContents {
        container: String,
        contents: Vec<String>,
    },
    ObjectDescription {
        name: String,
        description: String,
    },
    PointsAwarded {
        amount: usize,
        reason: String,
    },
    QuitSummary {
        rank: String,
        notes: String,
        score: usize,
        max_score: usize,
        turns: usize,
    },
    RoomAreas(Vec<String>),
    RoomDescription {
        name: String,
        area: Option<String>,
        description: String,
    },
    RoomExits(Vec<ExitLine>),
    RoomObjects(Vec<String>),
    ScoreSummary {
        rank: String,
        score: usize,
        max_score: usize,
        turns: usize,
    },
    TransitionMessage(String),
}

impl ViewItem {
    /// Classify a view item into a top-level output section.
    pub fn section(&self) -> Section {
        match self {
            ViewItem::TransitionMessage(_) => Section::Transition,
            ViewItem::RoomDescription { .. }
            | ViewItem::RoomAreas(_)
            | ViewItem::RoomExits(_)
            | ViewItem::RoomObjects(_) => Section::Environment,
            ViewItem::ActionSuccess(_)
            | ViewItem::ActionFailure(_)
            | ViewItem::Error(_)
            | ViewItem::Inventory(_)
            | ViewItem::ObjectContents { .. }
            | ViewItem::ObjectDescription { .. }
            | ViewItem::PointsAwarded { .. } => Section::DirectResult,
            ViewItem::EngineMessage(_)
            | ViewItem::Help(_)
            | ViewItem::QuitSummary { .. }
            | ViewItem::ScoreSummary { .. } => Section::System,
        }
    }

    fn render(&self) {
        match self {
            ViewItem::TransitionMessage(msg) => {
                println!("{}\n", fill(msg, normal_block()).transition_style());
            },
            ViewItem::RoomDescription { name, area, description } => {
                match area {
                    Some(area) => println!("{} ({})", name.room_titlebar_style(), area.area_style()),
                    None => println!("{}", name.room_titlebar_style()),
                }
                println!("{}\n", fill(description, normal_block()).description_style());
            },
            ViewItem::RoomObjects(names) => {
                println!("{}", "You see:".subheading_style());
                for name in names {
                    println!("   {}", name.object_style());
                }
                println!();
            },
            ViewItem::RoomAreas(names) => {
                let listed = names.iter().map(|n| n.area_style().to_string()).collect::<Vec<_>>();
                println!("{} {}\n", "Nearby:".subheading_style(), listed.join(", "));
            },
            ViewItem::RoomExits(exits) => {
                println!("{}", "Exits:".subheading_style());
                for exit in exits {
                    let line = format!("{} ({})", exit.direction, exit.destination);
                    let styled = if exit.exit_locked {
                        line.exit_locked_style()
                    } else if exit.dest_visited {
                        line.exit_visited_style()
                    } else {
                        line.exit_unvisited_style()
                    };
                    println!("   {styled}");
                }
                println!();
            },
            ViewItem::ObjectDescription { name, description } => {
                println!("{}", name.object_style().underline());
                println!("{}\n", fill(description, normal_block()).description_style());
            },
            ViewItem::ObjectContents { container, contents } => {
                if contents.is_empty() {
                    println!("The {} is empty.\n", container.object_style());
                } else {
                    println!("Inside the {}:", container.object_style());
                    for name in contents {
                        println!("   {}", name.object_style());
                    }
                    println!();
                }
            },
            ViewItem::Inventory(names) => {
                if names.is_empty() {
                    println!("You are empty-handed.\n");
                } else {
                    println!("{}", "You are carrying:".subheading_style());
                    for name in names {
                        println!("   {}", name.object_style());
                    }
                    println!();
                }
            },
            ViewItem::ActionSuccess(msg) | ViewItem::EngineMessage(msg) => {
                println!("{}\n", fill(msg, normal_block()));
            },
            ViewItem::ActionFailure(msg) => {
                println!("{}\n", fill(msg, normal_block()).denied_style());
            },
            ViewItem::Error(msg) => {
                println!("{}\n", fill(msg, normal_block()).error_style());
            },
            ViewItem::PointsAwarded { amount, reason } => {
                println!("{} {}\n", format!("+{amount}").bright_green().bold(), reason.italic());
            },
            ViewItem::Help(lines) => {
                println!("{}", "Things you can try:".subheading_style());
                for line in lines {
                    println!("{}", fill(&format!("{:<28}{}", line.command, line.description), indented_block()));
                }
                println!();
            },
            ViewItem::ScoreSummary {
                rank,
                score,
                max_score,
                turns,
            } => {
                println!("Score: {score} of {max_score} after {turns} turns.");
                println!("Rank: {}\n", rank.subheading_style());
            },
            ViewItem::QuitSummary {
                rank,
                notes,
                score,
                max_score,
                turns,
            } => {
                println!("Final score: {score} of {max_score} after {turns} turns.");
                println!("Rank: {}", rank.subheading_style());
                println!("{}\n", fill(notes, normal_block()).description_style());
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_order_environment_before_results() {
        assert!(Section::Transition < Section::Environment);
        assert!(Section::Environment < Section::DirectResult);
        assert!(Section::DirectResult < Section::System);
    }

    #[test]
    fn flush_empties_the_frame() {
        let mut view = View::new();
        view.push(ViewItem::ActionSuccess("Taken.".into()));
        view.push(ViewItem::RoomObjects(vec!["wrench".into()]));
        assert!(view.contains(ViewItem::is_action_success));
        view.flush();
        assert!(view.items.is_empty());
    }

    #[test]
    fn items_are_classified() {
        assert_eq!(ViewItem::Error("x".into()).section(), Section::DirectResult);
        assert_eq!(ViewItem::RoomExits(vec![]).section(), Section::Environment);
        assert_eq!(ViewItem::Help(vec![]).section(), Section::System);
    }
}
