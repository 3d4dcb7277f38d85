//! Process-backed speech: runs a text-to-speech program per utterance.
//!
//! The program and its arguments come from [`SpeechConfig`].  An argument
//! that is exactly `{text}` is replaced by the text to speak; when no such
//! argument exists the text is appended as the last argument, unless
//! `append_text` is off.  The text is
//! also exported as [`SPEECH_TEXT_ENV`] so shell-based programs (PowerShell
//! SAPI on Windows) can read it without quoting issues.
//!
//! | Platform | Default program                              |
//! |----------|----------------------------------------------|
//! | Linux    | `espeak-ng {text}`                           |
//! | macOS    | `say {text}`                                 |
//! | Windows  | `powershell` + `System.Speech` synthesizer   |

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::config::SpeechConfig;

use super::{SpeechEngine, SpeechError, SpeechSynthesizer};

/// Environment variable carrying the text to speak.
pub const SPEECH_TEXT_ENV: &str = "GRAMMAR_CHECKER_SPEECH_TEXT";

/// Placeholder argument replaced by the text to speak.
const TEXT_PLACEHOLDER: &str = "{text}";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// CommandSynthesizer
// ---------------------------------------------------------------------------

/// Creates [`CommandEngine`]s for a configured text-to-speech program.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    append_text: bool,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            append_text: true,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone()).append_text(config.append_text)
    }

    /// Whether the text is appended when the arguments have no `{text}`.
    pub fn append_text(mut self, append: bool) -> Self {
        self.append_text = append;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn init_engine(&self) -> Result<Arc<dyn SpeechEngine>, SpeechError> {
        let program = find_program(&self.program)
            .ok_or_else(|| SpeechError::ProgramNotFound(self.program.clone()))?;
        log::debug!("speech: using {}", program.display());

        Ok(Arc::new(CommandEngine {
            program,
            args: self.args.clone(),
            append_text: self.append_text,
            child: Mutex::new(None),
            stopped: AtomicBool::new(false),
        }))
    }
}

// ---------------------------------------------------------------------------
// CommandEngine
// ---------------------------------------------------------------------------

/// A single-use engine: one child process, killed on [`stop`](SpeechEngine::stop).
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    append_text: bool,
    child: Mutex<Option<Child>>,
    stopped: AtomicBool,
}

impl CommandEngine {
    fn child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SpeechEngine for CommandEngine {
    fn speak_and_wait(&self, text: &str) -> Result<(), SpeechError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Ok(());
        }

        let child = Command::new(&self.program)
            .args(build_args(&self.args, text, self.append_text))
            .env(SPEECH_TEXT_ENV, text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Spawn(e.to_string()))?;

        {
            let mut slot = self.child();
            *slot = Some(child);
            // stop() may have run between the check above and the spawn.
            if self.stopped.load(Ordering::SeqCst) {
                if let Some(mut child) = slot.take() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                return Ok(());
            }
        }

        loop {
            {
                let mut slot = self.child();
                let Some(child) = slot.as_mut() else {
                    // Taken by stop().
                    return Ok(());
                };
                match child.try_wait() {
                    Ok(Some(status)) => {
                        slot.take();
                        if status.success() || self.stopped.load(Ordering::SeqCst) {
                            return Ok(());
                        }
                        return Err(SpeechError::Playback(format!(
                            "{} exited with {status}",
                            self.program.display()
                        )));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        slot.take();
                        return Err(SpeechError::Playback(e.to_string()));
                    }
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(mut child) = self.child().take() {
            if let Err(e) = child.kill() {
                log::debug!("speech: kill failed (already exited?): {e}");
            }
            let _ = child.wait();
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Substitute `{text}` placeholders, or append the text when there are none
/// and `append` is set.
fn build_args(template: &[String], text: &str, append: bool) -> Vec<String> {
    if template.iter().any(|a| a == TEXT_PLACEHOLDER) {
        template
            .iter()
            .map(|a| {
                if a == TEXT_PLACEHOLDER {
                    text.to_string()
                } else {
                    a.clone()
                }
            })
            .collect()
    } else {
        let mut args = template.to_vec();
        if append {
            args.push(text.to_string());
        }
        args
    }
}

/// Resolve `program` against `PATH`, or directly when it contains a path
/// separator.
fn find_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let path = env::var_os("PATH")?;
    env::split_paths(&path).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{program}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn placeholder_is_replaced() {
        let args = build_args(&strings(&["-v", "en", "{text}"]), "Hello there", true);
        assert_eq!(args, strings(&["-v", "en", "Hello there"]));
    }

    #[test]
    fn text_is_appended_without_placeholder() {
        let args = build_args(&strings(&["-r", "180"]), "Hi", true);
        assert_eq!(args, strings(&["-r", "180", "Hi"]));
    }

    #[test]
    fn text_is_appended_to_empty_template() {
        assert_eq!(build_args(&[], "Hi", true), strings(&["Hi"]));
    }

    #[test]
    fn text_is_not_appended_when_disabled() {
        let template = strings(&["-Command", "Speak($env:X)"]);
        assert_eq!(build_args(&template, "Hi", false), template);
    }

    #[test]
    fn from_config_carries_append_flag() {
        let config = SpeechConfig {
            program: "powershell".into(),
            args: vec![],
            append_text: false,
        };
        assert!(!CommandSynthesizer::from_config(&config).append_text);
    }

    #[test]
    fn missing_program_is_reported() {
        let synth = CommandSynthesizer::new("definitely-not-a-tts-program-xyz", vec![]);
        match synth.init_engine() {
            Err(SpeechError::ProgramNotFound(name)) => {
                assert_eq!(name, "definitely-not-a-tts-program-xyz")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected ProgramNotFound"),
        }
    }

    #[test]
    fn empty_program_is_not_found() {
        assert!(find_program("").is_none());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::time::Instant;

        fn sh(script: &str) -> Arc<dyn SpeechEngine> {
            CommandSynthesizer::new("sh", strings(&["-c", script, "{text}"]))
                .init_engine()
                .expect("sh is on PATH")
        }

        #[test]
        fn finds_sh_on_path() {
            let path = find_program("sh").expect("sh on PATH");
            assert!(path.is_file());
        }

        #[test]
        fn successful_exit_is_ok() {
            assert_eq!(sh("exit 0").speak_and_wait("hello"), Ok(()));
        }

        #[test]
        fn failing_exit_is_a_playback_error() {
            let result = sh("exit 3").speak_and_wait("hello");
            assert!(matches!(result, Err(SpeechError::Playback(_))));
        }

        #[test]
        fn text_is_exported_in_the_environment() {
            let engine = sh(r#"test "$GRAMMAR_CHECKER_SPEECH_TEXT" = "hello world""#);
            assert_eq!(engine.speak_and_wait("hello world"), Ok(()));
        }

        #[test]
        fn environment_only_program_receives_no_trailing_argument() {
            let engine = CommandSynthesizer::new("sh", strings(&["-c", r#"test "$#" = 0"#]))
                .append_text(false)
                .init_engine()
                .expect("sh is on PATH");
            assert_eq!(engine.speak_and_wait("hello"), Ok(()));
        }

        #[test]
        fn stop_interrupts_speech() {
            let engine = sh("sleep 5");
            let worker = {
                let engine = Arc::clone(&engine);
                thread::spawn(move || engine.speak_and_wait("long text"))
            };

            thread::sleep(Duration::from_millis(200));
            let started = Instant::now();
            engine.stop();

            assert_eq!(worker.join().unwrap(), Ok(()));
            assert!(started.elapsed() < Duration::from_secs(4));
        }

        #[test]
        fn stop_before_speaking_skips_the_process() {
            let engine = sh("exit 7");
            engine.stop();
            assert_eq!(engine.speak_and_wait("hello"), Ok(()));
        }
    }
}
