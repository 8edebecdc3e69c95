use std::io::{BufRead, Write};

/// Which audio container(s) a workflow should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSelection {
    M4a,
    Mp3,
    Both,
}

/// The single per-batch decision: what to produce for every discovered file.
///
/// One value governs the whole run; there is no per-file override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowChoice {
    AudioOnly(AudioSelection),
    TextOnly,
    AudioAndText(AudioSelection),
}

impl WorkflowChoice {
    pub fn wants_m4a(&self) -> bool {
        matches!(
            self,
            WorkflowChoice::AudioOnly(AudioSelection::M4a | AudioSelection::Both)
                | WorkflowChoice::AudioAndText(AudioSelection::M4a | AudioSelection::Both)
        )
    }

    pub fn wants_mp3(&self) -> bool {
        matches!(
            self,
            WorkflowChoice::AudioOnly(AudioSelection::Mp3 | AudioSelection::Both)
                | WorkflowChoice::AudioAndText(AudioSelection::Mp3 | AudioSelection::Both)
        )
    }

    pub fn wants_text(&self) -> bool {
        matches!(
            self,
            WorkflowChoice::TextOnly | WorkflowChoice::AudioAndText(_)
        )
    }

    /// Map non-interactive CLI flags to a workflow. Returns `None` when no
    /// mode flag was given, in which case the interactive menu decides.
    pub fn from_flags(
        m4a_only: bool,
        mp3_only: bool,
        audio_only: bool,
        text_only: bool,
        all: bool,
    ) -> Option<Self> {
        if all {
            Some(WorkflowChoice::AudioAndText(AudioSelection::Both))
        } else if text_only {
            Some(WorkflowChoice::TextOnly)
        } else if m4a_only {
            Some(WorkflowChoice::AudioOnly(AudioSelection::M4a))
        } else if mp3_only {
            Some(WorkflowChoice::AudioOnly(AudioSelection::Mp3))
        } else if audio_only {
            Some(WorkflowChoice::AudioOnly(AudioSelection::Both))
        } else {
            None
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            WorkflowChoice::AudioOnly(AudioSelection::M4a) => "M4A audio only",
            WorkflowChoice::AudioOnly(AudioSelection::Mp3) => "MP3 audio only",
            WorkflowChoice::AudioOnly(AudioSelection::Both) => "M4A + MP3 audio",
            WorkflowChoice::TextOnly => "transcript only",
            WorkflowChoice::AudioAndText(AudioSelection::M4a) => "M4A audio + transcript",
            WorkflowChoice::AudioAndText(AudioSelection::Mp3) => "MP3 audio + transcript",
            WorkflowChoice::AudioAndText(AudioSelection::Both) => "M4A + MP3 audio + transcript",
        }
    }
}

const MENU: &[(&str, WorkflowChoice)] = &[
    ("1", WorkflowChoice::AudioOnly(AudioSelection::M4a)),
    ("2", WorkflowChoice::AudioOnly(AudioSelection::Mp3)),
    ("3", WorkflowChoice::AudioOnly(AudioSelection::Both)),
    ("4", WorkflowChoice::TextOnly),
    ("5", WorkflowChoice::AudioAndText(AudioSelection::M4a)),
    ("6", WorkflowChoice::AudioAndText(AudioSelection::Mp3)),
    ("7", WorkflowChoice::AudioAndText(AudioSelection::Both)),
];

/// Present the workflow menu and block for one valid choice.
///
/// Decision logic is decoupled from the terminal: any `BufRead`/`Write` pair
/// can drive it, which is how the tests exercise re-prompting. Invalid input
/// re-prompts in place and is never an error; only a closed input stream is.
pub fn select_workflow<R: BufRead, W: Write>(
    file_count: usize,
    mut input: R,
    mut output: W,
) -> std::io::Result<WorkflowChoice> {
    writeln!(output, "Found {} file(s) to process.", file_count)?;
    writeln!(output, "Select a workflow to apply to all of them:")?;
    for (key, choice) in MENU {
        writeln!(output, "  {}) {}", key, choice.describe())?;
    }

    loop {
        write!(output, "Choice [1-{}]: ", MENU.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before a workflow was chosen",
            ));
        }

        let trimmed = line.trim();
        if let Some((_, choice)) = MENU.iter().find(|(key, _)| *key == trimmed) {
            return Ok(*choice);
        }
        writeln!(output, "Invalid choice '{}', please try again.", trimmed)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn choose(input: &str) -> std::io::Result<WorkflowChoice> {
        let mut out = Vec::new();
        select_workflow(3, Cursor::new(input), &mut out)
    }

    #[test]
    fn every_menu_entry_maps_to_its_choice() {
        for (key, expected) in MENU {
            let got = choose(&format!("{}\n", key)).unwrap();
            assert_eq!(got, *expected);
        }
    }

    #[test]
    fn invalid_input_reprompts_until_valid() {
        let mut out = Vec::new();
        let choice = select_workflow(1, Cursor::new("9\nhello\n\n4\n"), &mut out).unwrap();
        assert_eq!(choice, WorkflowChoice::TextOnly);

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Invalid choice").count(), 3);
    }

    #[test]
    fn every_workflow_variant_is_reachable_from_the_menu() {
        use AudioSelection::*;
        for choice in [
            WorkflowChoice::AudioOnly(M4a),
            WorkflowChoice::AudioOnly(Mp3),
            WorkflowChoice::AudioOnly(Both),
            WorkflowChoice::TextOnly,
            WorkflowChoice::AudioAndText(M4a),
            WorkflowChoice::AudioAndText(Mp3),
            WorkflowChoice::AudioAndText(Both),
        ] {
            assert!(
                MENU.iter().any(|(_, entry)| *entry == choice),
                "no menu entry for {:?}",
                choice
            );
        }
    }

    #[test]
    fn whitespace_around_choice_is_tolerated() {
        assert_eq!(
            choose("  2 \n").unwrap(),
            WorkflowChoice::AudioOnly(AudioSelection::Mp3)
        );
    }

    #[test]
    fn closed_input_is_an_error_not_a_default() {
        assert!(choose("").is_err());
    }

    #[test]
    fn flag_mapping_matches_menu_semantics() {
        assert_eq!(
            WorkflowChoice::from_flags(true, false, false, false, false),
            Some(WorkflowChoice::AudioOnly(AudioSelection::M4a))
        );
        assert_eq!(
            WorkflowChoice::from_flags(false, true, false, false, false),
            Some(WorkflowChoice::AudioOnly(AudioSelection::Mp3))
        );
        assert_eq!(
            WorkflowChoice::from_flags(false, false, true, false, false),
            Some(WorkflowChoice::AudioOnly(AudioSelection::Both))
        );
        assert_eq!(
            WorkflowChoice::from_flags(false, false, false, true, false),
            Some(WorkflowChoice::TextOnly)
        );
        assert_eq!(
            WorkflowChoice::from_flags(false, false, false, false, true),
            Some(WorkflowChoice::AudioAndText(AudioSelection::Both))
        );
        assert_eq!(
            WorkflowChoice::from_flags(false, false, false, false, false),
            None
        );
    }

    #[test]
    fn target_predicates_cover_all_variants() {
        let both = WorkflowChoice::AudioAndText(AudioSelection::Both);
        assert!(both.wants_m4a() && both.wants_mp3() && both.wants_text());

        let text = WorkflowChoice::TextOnly;
        assert!(!text.wants_m4a() && !text.wants_mp3() && text.wants_text());

        let m4a = WorkflowChoice::AudioOnly(AudioSelection::M4a);
        assert!(m4a.wants_m4a() && !m4a.wants_mp3() && !m4a.wants_text());
    }
}
