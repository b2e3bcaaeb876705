//! Plain-text rendering of the page for the terminal.

use std::fmt::Write as _;

use board_core::{
    render::{ParticipantsBlock, LOADING_NOTICE, NO_PARTICIPANTS},
    surface::ListArea,
    PageSnapshot,
};

pub fn page_text(page: &PageSnapshot) -> String {
    let mut out = String::new();
    match &page.list {
        ListArea::Loading => {
            let _ = writeln!(out, "{LOADING_NOTICE}");
        }
        ListArea::Failed(notice) => {
            let _ = writeln!(out, "{notice}");
        }
        ListArea::Cards(cards) => {
            for card in cards {
                let _ = writeln!(out, "== {} ==", card.name);
                let _ = writeln!(out, "{}", card.description);
                let _ = writeln!(out, "Schedule: {}", card.schedule);
                let _ = writeln!(
                    out,
                    "Availability: {} spots left{}",
                    card.displayed_spots_left(),
                    if card.is_full() { " (full)" } else { "" }
                );
                match &card.participants {
                    ParticipantsBlock::Empty => {
                        let _ = writeln!(out, "  {NO_PARTICIPANTS}");
                    }
                    ParticipantsBlock::List(entries) => {
                        for entry in entries {
                            let _ = writeln!(out, "  - {}", entry.email);
                        }
                    }
                }
                out.push('\n');
            }
        }
    }

    if let Some(feedback) = page.visible_feedback() {
        let tag = if feedback.is_error() { "error" } else { "ok" };
        let _ = writeln!(out, "[{tag}] {}", feedback.text);
    }
    out
}
