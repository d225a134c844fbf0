//! Course/week reading lists shown in the course browser.
//!
//! Pure static data: a nested map `course -> week label -> topics`, built once
//! from the outlines below. Anything not in the map gets the generic
//! placeholder line for the requested week.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const HCI_COURSE: &str = "Design and Implementation of Human-Computer Interfaces";

/// Courses listed in the browser, in display order.
pub const COURSES: [&str; 6] = [
    HCI_COURSE,
    "Psychology of Learning",
    "Course 3",
    "Course 4",
    "Course 5",
    "Course 6",
];

pub const WEEKS_PER_COURSE: u32 = 12;

/// Courses with content, and the prefix their topic lines carry.
const OUTLINES: [(&str, &str); 3] = [
    (HCI_COURSE, ""),
    ("Course 2", "Course 2 - "),
    ("Course 3", "Course 3 - "),
];

/// Hand-entered items for the first HCI week.
const HCI_WEEK_1: [&str; 15] = [
    "hello", "1234", "hello", "hello", "1234", "hello", "hello", "1234", "hello", "hello", "1234",
    "hello", "hello", "1234", "hello",
];

const TOPIC_LETTERS: [char; 12] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L'];

type WeekTable = HashMap<String, Vec<String>>;

pub struct StaticContentCatalog {
    table: HashMap<&'static str, WeekTable>,
}

pub fn week_label(week: u32) -> String {
    format!("Week {}", week)
}

/// Placeholder shown for weeks without content.
pub fn fallback_content(week_label: &str) -> String {
    format!("Content for {}...", week_label)
}

impl StaticContentCatalog {
    /// The process-wide catalog; it never changes after first use.
    pub fn global() -> &'static StaticContentCatalog {
        static CATALOG: OnceLock<StaticContentCatalog> = OnceLock::new();
        CATALOG.get_or_init(StaticContentCatalog::new)
    }

    pub fn new() -> Self {
        let mut table = HashMap::new();

        for (course, prefix) in OUTLINES {
            let weeks: WeekTable = (1..=WEEKS_PER_COURSE)
                .map(|week| (week_label(week), outline_topics(prefix, week)))
                .collect();
            table.insert(course, weeks);
        }

        if let Some(weeks) = table.get_mut(HCI_COURSE) {
            weeks.insert(
                week_label(1),
                HCI_WEEK_1.iter().map(|item| item.to_string()).collect(),
            );
        }

        Self { table }
    }

    /// Topics for `(course, week)`. Total: unknown pairs yield the placeholder.
    pub fn lookup(&self, course: &str, week: &str) -> Vec<String> {
        self.table
            .get(course)
            .and_then(|weeks| weeks.get(week))
            .cloned()
            .unwrap_or_else(|| vec![fallback_content(week)])
    }

    pub fn courses(&self) -> &'static [&'static str] {
        &COURSES
    }

    pub fn week_labels(&self) -> Vec<String> {
        (1..=WEEKS_PER_COURSE).map(week_label).collect()
    }
}

impl Default for StaticContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Three topics a week; the closing week reviews twelve.
fn outline_topics(prefix: &str, week: u32) -> Vec<String> {
    let count = if week == WEEKS_PER_COURSE { 12 } else { 3 };
    TOPIC_LETTERS[..count]
        .iter()
        .map(|letter| format!("{}Week {} - Topic {}", prefix, week, letter))
        .collect()
}
