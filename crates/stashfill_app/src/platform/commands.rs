use stashfill_core::Msg;

/// Everything the main loop reacts to: typed commands and engine results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Msg(Msg),
    /// Trigger a fill with the announce URL currently on the form.
    Fill,
    Announce(String),
    /// Print the catalog page for the current scene.
    Open,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  scene <id>                 look up a catalog scene
  file <id>                  choose which scene file to fill from
  template <key>             choose the description template
  screens on|off             include screenshots in the description
  announce <url>             set the tracker announce URL
  fill                       request a fill from the backend
  edit <tag> <target...>     change the suggested target of a tag
  toggle <tag> on|off        mark a tag as ignored (on) or accepted (off)
  ignore-all on|off          set the ignore flag on every pending tag
  accept <tag> [target...]   save one tag mapping now
  ignore <tag>               ignore one tag now
  submit                     save every pending tag decision
  start                      start seeding the generated torrent
  open                       print the catalog page for the scene
  show | help | quit";

/// Parses one line of user input; blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    let Some((command, rest)) = split_word(line) else {
        return Ok(None);
    };

    let input = match command {
        "scene" => Input::Msg(Msg::SceneIdChanged(rest.to_string())),
        "file" => Input::Msg(Msg::FileSelected(required(rest, "file id")?)),
        "template" => Input::Msg(Msg::TemplateSelected(required(rest, "template key")?)),
        "screens" => Input::Msg(Msg::ScreensToggled(flag(rest)?)),
        "announce" => Input::Announce(required(rest, "announce url")?),
        "fill" => Input::Fill,
        "edit" => {
            let (source, target) = split_word(rest).ok_or("usage: edit <tag> <target>")?;
            Input::Msg(Msg::SuggestionEdited {
                source: source.to_string(),
                target: target.to_string(),
            })
        }
        "toggle" => {
            let (source, value) = split_word(rest).ok_or("usage: toggle <tag> on|off")?;
            Input::Msg(Msg::SuggestionIgnoreToggled {
                source: source.to_string(),
                ignore: flag(value)?,
            })
        }
        "ignore-all" => Input::Msg(Msg::IgnoreAllToggled(flag(rest)?)),
        "accept" => {
            let (source, target) = split_word(rest).ok_or("usage: accept <tag> [target]")?;
            Input::Msg(Msg::SuggestionDecided {
                source: source.to_string(),
                ignore: false,
                final_tag: (!target.is_empty()).then(|| target.to_string()),
            })
        }
        "ignore" => Input::Msg(Msg::SuggestionDecided {
            source: required(rest, "tag")?,
            ignore: true,
            final_tag: None,
        }),
        "submit" => Input::Msg(Msg::DecideAllClicked),
        "start" => Input::Msg(Msg::StartTorrentClicked),
        "open" => Input::Open,
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command {other:?}; type help")),
    };
    Ok(Some(input))
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((text, "")),
    }
}

fn required(rest: &str, what: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("missing {what}"))
    } else {
        Ok(rest.to_string())
    }
}

fn flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected on or off, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> Input {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn scene_keeps_raw_id_and_allows_clearing() {
        assert_eq!(parse("scene 1234"), Input::Msg(Msg::SceneIdChanged("1234".into())));
        assert_eq!(parse("scene"), Input::Msg(Msg::SceneIdChanged(String::new())));
    }

    #[test]
    fn edit_keeps_multi_word_targets() {
        assert_eq!(
            parse("edit bj  Oral Sex"),
            Input::Msg(Msg::SuggestionEdited {
                source: "bj".into(),
                target: "Oral Sex".into(),
            })
        );
    }

    #[test]
    fn accept_with_and_without_override() {
        assert_eq!(
            parse("accept anal"),
            Input::Msg(Msg::SuggestionDecided {
                source: "anal".into(),
                ignore: false,
                final_tag: None,
            })
        );
        assert_eq!(
            parse("accept bj Oral"),
            Input::Msg(Msg::SuggestionDecided {
                source: "bj".into(),
                ignore: false,
                final_tag: Some("Oral".into()),
            })
        );
    }

    #[test]
    fn ignore_decides_immediately() {
        assert_eq!(
            parse("ignore milf"),
            Input::Msg(Msg::SuggestionDecided {
                source: "milf".into(),
                ignore: true,
                final_tag: None,
            })
        );
    }

    #[test]
    fn flags_accept_on_off() {
        assert_eq!(parse("screens off"), Input::Msg(Msg::ScreensToggled(false)));
        assert_eq!(parse("ignore-all ON"), Input::Msg(Msg::IgnoreAllToggled(true)));
        assert!(parse_line("screens maybe").is_err());
    }

    #[test]
    fn missing_arguments_and_unknown_commands_are_errors() {
        assert!(parse_line("file").is_err());
        assert!(parse_line("edit bj").is_ok());
        assert!(parse_line("toggle").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
