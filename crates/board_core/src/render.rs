//! Turns an [`ActivityDirectory`] snapshot into cards, select options and
//! HTML. Markup lives in `templates/`; askama escapes every interpolated
//! value.

use askama::Template;
use shared::domain::{Activity, ActivityDirectory};

use crate::surface::{ListArea, PageSnapshot};

pub const PLACEHOLDER_OPTION_LABEL: &str = "-- Select an activity --";
pub const NO_PARTICIPANTS: &str = "No participants yet";
pub const LOADING_NOTICE: &str = "Loading activities...";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load activities. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveControl {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub email: String,
    pub remove: RemoveControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantsBlock {
    Empty,
    List(Vec<ParticipantEntry>),
}

impl ParticipantsBlock {
    pub fn entries(&self) -> &[ParticipantEntry] {
        match self {
            ParticipantsBlock::Empty => &[],
            ParticipantsBlock::List(entries) => entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: ParticipantsBlock,
}

impl ActivityCard {
    pub fn from_activity(activity: &Activity) -> Self {
        let participants = if activity.participants.is_empty() {
            ParticipantsBlock::Empty
        } else {
            ParticipantsBlock::List(
                activity
                    .participants
                    .iter()
                    .map(|email| ParticipantEntry {
                        email: email.clone(),
                        remove: RemoveControl {
                            activity: activity.name.clone(),
                            email: email.clone(),
                        },
                    })
                    .collect(),
            )
        };

        Self {
            name: activity.name.clone(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            participants,
        }
    }

    /// Over-capacity rosters show zero rather than a negative count.
    pub fn displayed_spots_left(&self) -> i64 {
        self.spots_left.max(0)
    }

    pub fn is_full(&self) -> bool {
        self.spots_left <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: PLACEHOLDER_OPTION_LABEL.to_string(),
        }
    }

    pub fn activity(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
        }
    }

    /// The placeholder is never marked selected.
    pub fn is_selected(&self, current: &str) -> bool {
        !self.value.is_empty() && self.value == current
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBoard {
    pub cards: Vec<ActivityCard>,
    pub options: Vec<SelectOption>,
}

pub fn render(directory: &ActivityDirectory) -> RenderedBoard {
    let mut cards = Vec::with_capacity(directory.len());
    let mut options = Vec::with_capacity(directory.len() + 1);
    options.push(SelectOption::placeholder());

    for activity in directory.iter() {
        cards.push(ActivityCard::from_activity(activity));
        options.push(SelectOption::activity(&activity.name));
    }

    RenderedBoard { cards, options }
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a ActivityCard,
    no_participants: &'static str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    page: &'a PageSnapshot,
    notice: &'a str,
    cards: &'a [ActivityCard],
    no_participants: &'static str,
    selected: &'a str,
    message_class: String,
    message: &'a str,
}

pub fn card_html(card: &ActivityCard) -> askama::Result<String> {
    CardTemplate {
        card,
        no_participants: NO_PARTICIPANTS,
    }
    .render()
}

/// Full page document for a board snapshot.
pub fn page_html(page: &PageSnapshot) -> askama::Result<String> {
    let (notice, cards): (&str, &[ActivityCard]) = match &page.list {
        ListArea::Loading => (LOADING_NOTICE, &[]),
        ListArea::Failed(notice) => (notice.as_str(), &[]),
        ListArea::Cards(cards) => ("", cards.as_slice()),
    };
    let (message_class, message) = match &page.feedback {
        Some(feedback) if page.feedback_visible => {
            (feedback.css_class().to_string(), feedback.text.as_str())
        }
        Some(feedback) => (
            format!("{} hidden", feedback.css_class()),
            feedback.text.as_str(),
        ),
        None => ("hidden".to_string(), ""),
    };

    PageTemplate {
        page,
        notice,
        cards,
        no_participants: NO_PARTICIPANTS,
        selected: &page.form.activity,
        message_class,
        message,
    }
    .render()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
