use std::io::{self, BufRead, Write};

use crate::config::ExplorerConfig;
use crate::data::filter::Selection;

// ---------------------------------------------------------------------------
// Console – line-oriented prompts over any reader/writer pair
// ---------------------------------------------------------------------------

/// Interactive console.  Generic over its streams so sessions can be driven
/// from stdin/stdout or from in-memory buffers.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Where reports are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt`, read one line and return it lowercased with
    /// surrounding whitespace removed.
    ///
    /// A closed input stream is an `UnexpectedEof` error: there is nobody
    /// left to answer.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_lowercase())
    }

    /// Keep asking until the answer is one of `valid_options`.
    pub fn get_user_input(&mut self, prompt: &str, valid_options: &[&str]) -> io::Result<String> {
        loop {
            let answer = self.ask(prompt)?;
            if valid_options.contains(&answer.as_str()) {
                return Ok(answer);
            }
            log::debug!("Rejected input {answer:?}");
            writeln!(
                self.output,
                "Invalid input. Please enter one of: {}.",
                valid_options.join(", ")
            )?;
        }
    }

    /// `true` only for an answer of "yes"; anything else declines.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self.ask(prompt)? == "yes")
    }
}

/// Ask for the city, month and day to analyse.
pub fn get_filters<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &ExplorerConfig,
) -> io::Result<Selection> {
    writeln!(console.output(), "\nHello! Let's explore some US bikeshare data!")?;

    let cities = config.city_options();
    let city = console.get_user_input(
        &format!(
            "\nWhich city would you like to analyze? ({}): ",
            title_list(&cities)
        ),
        &cities,
    )?;

    let month = console.get_user_input(
        &format!(
            "\nWhich month would you like to filter by? (all, {}): ",
            title_list(&config.months.iter().map(String::as_str).collect::<Vec<_>>())
        ),
        &config.month_options(),
    )?;

    let day = console.get_user_input(
        &format!(
            "\nWhich day of the week would you like to filter by? (all, {}): ",
            title_list(&config.days.iter().map(String::as_str).collect::<Vec<_>>())
        ),
        &config.day_options(),
    )?;

    writeln!(console.output(), "{}", "-".repeat(40))?;
    Ok(Selection { city, month, day })
}

/// Capitalise the first letter of every word: `"new york"` → `"New York"`.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| title_case(s))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn reprompts_until_valid() {
        let mut c = console("Xyz\nmaybe\nYES\n");
        let answer = c.get_user_input("Continue? ", &["yes", "no"]).unwrap();
        assert_eq!(answer, "yes");

        let out = output(c);
        assert_eq!(out.matches("Continue? ").count(), 3);
        assert_eq!(
            out.matches("Invalid input. Please enter one of: yes, no.").count(),
            2
        );
    }

    #[test]
    fn answer_is_lowercased_and_trimmed() {
        let mut c = console("  New York \r\n");
        let answer = c
            .get_user_input("City? ", &["chicago", "new york", "washington"])
            .unwrap();
        assert_eq!(answer, "new york");
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut c = console("nope\n");
        let err = c.get_user_input("? ", &["yes", "no"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let mut c = console("Yes\ny\nno\n");
        assert!(c.confirm("? ").unwrap());
        assert!(!c.confirm("? ").unwrap());
        assert!(!c.confirm("? ").unwrap());
    }

    #[test]
    fn get_filters_collects_three_answers() {
        let mut c = console("boston\nChicago\nMarch\njuly\nall\n");
        let selection = get_filters(&mut c, &ExplorerConfig::default()).unwrap();
        assert_eq!(
            selection,
            Selection {
                city: "chicago".into(),
                month: "march".into(),
                day: "all".into(),
            }
        );

        let out = output(c);
        assert!(out.contains("(Chicago, New York, Washington)"));
        assert!(out.contains("(all, January, February, March, April, May, June)"));
        assert!(out.contains("one of: chicago, new york, washington."));
        assert!(out.contains("one of: all, monday, tuesday"));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("wednesday"), "Wednesday");
        assert_eq!(title_case(""), "");
    }
}
