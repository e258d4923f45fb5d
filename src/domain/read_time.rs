//! Reading-time estimation for raw article content.

const WORDS_PER_MINUTE: usize = 200;

/// Approximate reading time in whole minutes.
///
/// Words are whitespace-delimited runs; the count is divided by 200 words per
/// minute and rounded up, so any non-empty content reports at least 1 minute.
pub fn estimate_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_is_zero_minutes() {
        assert_eq!(estimate_read_time(""), 0);
        assert_eq!(estimate_read_time("   \n\t "), 0);
    }

    #[test]
    fn short_content_rounds_up_to_one_minute() {
        assert_eq!(estimate_read_time("one"), 1);
        assert_eq!(estimate_read_time("a quick note"), 1);
    }

    #[test]
    fn word_count_divides_by_two_hundred() {
        let exactly_two_minutes = "word ".repeat(400);
        assert_eq!(estimate_read_time(&exactly_two_minutes), 2);

        let just_over = "word ".repeat(401);
        assert_eq!(estimate_read_time(&just_over), 3);
    }

    #[test]
    fn whitespace_runs_delimit_single_words() {
        assert_eq!(estimate_read_time("one\n\ntwo\t three    four"), 1);
    }
}
