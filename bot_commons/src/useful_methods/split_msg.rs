/// Maximum length of a Telegram message's text after entity parsing.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Length of the text the way Telegram counts it, in UTF-16 code units.
pub fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Iterator that splits text into pieces, all of which are at most
/// a specified [`telegram_len`].
///
/// Cuts between paragraphs if it can, then between lines, then between
/// words, and only cuts through a word if there's no other way.
/// Whitespace around the cuts is dropped.
pub struct SplitToFit<'a> {
    data: &'a str,
    max_len: usize,
}

impl<'a> SplitToFit<'a> {
    /// # Panics
    /// Panics if `max_len` is less than 2, since a single character
    /// may take that much.
    #[must_use]
    pub fn new(data: &'a str, max_len: usize) -> Self {
        assert!(max_len >= 2, "Max length is too small");
        SplitToFit { data, max_len }
    }

    /// Take the next piece, fitting it into `max_len` instead of the
    /// length this splitter was made with. At least one character is
    /// always taken.
    pub fn next_fitting(&mut self, max_len: usize) -> Option<&'a str> {
        self.data = self.data.trim_start();
        if self.data.is_empty() {
            return None;
        }

        // Byte index of the first character that does not fit.
        let mut len = 0;
        let overflow_at = self.data.char_indices().find_map(|(i, c)| {
            len += c.len_utf16();
            (len > max_len).then_some(i)
        });

        let Some(overflow_at) = overflow_at else {
            let output = self.data;
            self.data = "";
            return Some(output.trim_end());
        };

        if overflow_at == 0 {
            let first_len = self.data.chars().next().map_or(0, char::len_utf8);
            let (output, rest) = self.data.split_at(first_len);
            self.data = rest;
            return Some(output);
        }

        let window = &self.data[..overflow_at];
        let cut = window
            .rfind("\n\n")
            .or_else(|| window.rfind('\n'))
            .or_else(|| window.rfind(char::is_whitespace))
            .filter(|&x| x > 0)
            .unwrap_or(overflow_at);

        let (output, rest) = self.data.split_at(cut);
        self.data = rest;
        Some(output.trim_end())
    }
}

impl<'a> Iterator for SplitToFit<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_fitting(self.max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::{telegram_len, SplitToFit};

    #[test]
    fn fits_whole() {
        let mut splitter = SplitToFit::new("  hi hello  ", 22);
        assert_eq!(splitter.next(), Some("hi hello"));
        assert_eq!(splitter.next(), None);
        assert_eq!(SplitToFit::new("", 22).next(), None);
    }

    #[test]
    fn word_split() {
        let data = "hi hello hi   HELLO!!!";
        let splitter = SplitToFit::new(data, 21);
        assert_eq!(splitter.collect::<Vec<_>>(), ["hi hello hi", "HELLO!!!"]);
    }

    #[test]
    fn paragraphs_before_words() {
        let data = "aaa\n\nbbb ccc";
        let splitter = SplitToFit::new(data, 10);
        assert_eq!(splitter.collect::<Vec<_>>(), ["aaa", "bbb ccc"]);

        let data = "aaa bbb\nccc ddd";
        let splitter = SplitToFit::new(data, 12);
        assert_eq!(splitter.collect::<Vec<_>>(), ["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn char_split() {
        let splitter = SplitToFit::new("1234567", 3);
        assert_eq!(splitter.collect::<Vec<_>>(), ["123", "456", "7"]);
    }

    #[test]
    fn counts_utf16() {
        assert_eq!(telegram_len("привет"), 6);
        assert_eq!(telegram_len("😀"), 2);

        let splitter = SplitToFit::new("😀😀😀", 4);
        assert_eq!(splitter.collect::<Vec<_>>(), ["😀😀", "😀"]);
    }

    #[test]
    fn smaller_first_piece() {
        let mut splitter = SplitToFit::new("12345 12345", 11);
        assert_eq!(splitter.next_fitting(7), Some("12345"));
        assert_eq!(splitter.next(), Some("12345"));
        assert_eq!(splitter.next(), None);

        // Always makes progress, even with no room at all.
        let mut splitter = SplitToFit::new("ab", 11);
        assert_eq!(splitter.next_fitting(0), Some("a"));
        assert_eq!(splitter.next(), Some("b"));
    }
}
