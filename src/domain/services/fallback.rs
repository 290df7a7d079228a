#[cfg(test)]
#[path = "fallback_test.rs"]
mod tests;

struct Topic {
    name: &'static str,
    keywords: &'static [&'static str],
    answer: &'static str,
}

// Checked in order, first topic with a matching keyword wins.
const TOPICS: &[Topic] = &[
    Topic {
        name: "recursion",
        keywords: &["recursion"],
        answer: include_str!("../../../assets/fallback/recursion.md"),
    },
    Topic {
        name: "graph",
        keywords: &["graph"],
        answer: include_str!("../../../assets/fallback/graph.md"),
    },
    Topic {
        name: "debug",
        keywords: &["bug", "debug"],
        answer: include_str!("../../../assets/fallback/debug.md"),
    },
    Topic {
        name: "complexity",
        keywords: &["time complexity", "big o"],
        answer: include_str!("../../../assets/fallback/complexity.md"),
    },
    Topic {
        name: "sorting",
        keywords: &["sort", "sorting"],
        answer: include_str!("../../../assets/fallback/sorting.md"),
    },
];

const GENERAL_ANSWER: &str = include_str!("../../../assets/fallback/general.md");

fn find_topic(user_text: &str) -> Option<&'static Topic> {
    let lowered = user_text.to_lowercase();
    return TOPICS.iter().find(|topic| {
        return topic
            .keywords
            .iter()
            .any(|keyword| return lowered.contains(keyword));
    });
}

/// Name of the canned topic `user_text` resolves to, `None` for the general
/// answer.
pub fn topic(user_text: &str) -> Option<&'static str> {
    return find_topic(user_text).map(|topic| return topic.name);
}

/// Offline answer for `user_text`. Never fails, and identical input always
/// yields identical output.
pub fn respond(user_text: &str) -> String {
    let answer = find_topic(user_text)
        .map(|topic| return topic.answer)
        .unwrap_or(GENERAL_ANSWER);

    return answer.trim().to_string();
}
