//! The interactive quiz: menus, the sudden-death game loop, and settings.
//!
//! [`Game`] reads lines from any async buffered reader and writes to any
//! `Write`, so the whole flow runs against scripted input in tests.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use crossterm::cursor::MoveTo;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use oxvocab_core::model::{CefrLevel, VocabularyEntry};
use oxvocab_core::scores::{
    GameMode, SessionSnapshot, SessionStats, TopScores, UserAnswer, WordHistory,
};
use oxvocab_core::selector::WeightSelector;
use oxvocab_core::traits::Translator;
use oxvocab_core::validation::is_valid;

use crate::context::DataPaths;
use crate::report::{self, ExportDocument};

/// Consecutive words without a translation before a game is abandoned.
const MAX_TRANSLATION_FAILURES: u32 = 5;
const RECENT_LIMIT: usize = 10;
const LIST_LIMIT: usize = 5;

/// What the learner typed for one word.
enum Answer {
    Quit,
    Skip,
    Text(String),
}

pub struct Game<R, W> {
    selector: WeightSelector,
    translator: Arc<dyn Translator>,
    paths: DataPaths,
    top_scores: TopScores,
    history: WordHistory,
    target_language: String,
    input: Lines<R>,
    out: W,
    rng: StdRng,
}

impl<R: AsyncBufRead + Unpin, W: Write> Game<R, W> {
    pub fn new(
        selector: WeightSelector,
        translator: Arc<dyn Translator>,
        paths: DataPaths,
        input: R,
        out: W,
    ) -> Self {
        let top_scores = TopScores::load(&paths.top_scores());
        let history = WordHistory::load(&paths.history());
        Self {
            selector,
            translator,
            paths,
            top_scores,
            history,
            target_language: "Indonesian".to_string(),
            input: input.lines(),
            out,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    #[cfg(test)]
    fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    // -----------------------------------------------------------------------
    // Terminal helpers
    // -----------------------------------------------------------------------

    /// Print `text` and read one trimmed line. `None` at end of input.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{}", text.bold())?;
        self.out.flush()?;
        let line = self.input.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    async fn pause(&mut self, text: &str) -> Result<()> {
        writeln!(self.out)?;
        self.prompt(text).await?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        crossterm::queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn header(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(60);
        writeln!(self.out, "{}", rule.as_str().cyan())?;
        writeln!(self.out, "{}", format!("{title:^60}").cyan().bold())?;
        writeln!(self.out, "{}", rule.as_str().cyan())?;
        writeln!(self.out)?;
        Ok(())
    }

    fn info(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.blue())?;
        Ok(())
    }

    fn success(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.green())?;
        Ok(())
    }

    fn warning(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.yellow())?;
        Ok(())
    }

    fn error(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.red())?;
        Ok(())
    }

    fn save_scores(&mut self) -> Result<()> {
        if let Err(e) = self.top_scores.save(&self.paths.top_scores()) {
            tracing::error!("failed to save scores: {e:#}");
            self.error(&format!("Could not save scores: {e:#}"))?;
        }
        Ok(())
    }

    fn save_history(&mut self) {
        if let Err(e) = self.history.save(&self.paths.history()) {
            tracing::warn!("failed to save word history: {e:#}");
        }
    }

    // -----------------------------------------------------------------------
    // Menus
    // -----------------------------------------------------------------------

    /// Run the main menu until the learner exits or input ends.
    pub async fn main_menu(&mut self) -> Result<()> {
        loop {
            self.clear_screen()?;
            self.header("oxvocab")?;
            self.info("Learn English vocabulary with adaptive practice.")?;
            writeln!(self.out)?;
            self.success(&format!("Overall Top Score: {}", self.top_scores.overall))?;
            writeln!(self.out, "\nBest Scores by Level:")?;
            for level in CefrLevel::ALL {
                writeln!(
                    self.out,
                    "   {}: {:2} ({})",
                    level.as_str().to_uppercase(),
                    self.top_scores.level_best(level),
                    level.description()
                )?;
            }

            writeln!(self.out, "\n{}", "Choose your game mode:".yellow())?;
            writeln!(self.out, "1. Custom Mode (choose a level)")?;
            writeln!(self.out, "2. Adventure Mode (random levels A1-B2)")?;
            writeln!(self.out, "3. View Statistics")?;
            writeln!(self.out, "4. Settings")?;
            writeln!(self.out, "5. Exit")?;

            let Some(choice) = self.prompt("\nEnter your choice (1-5): ").await? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.custom_mode().await?,
                "2" => self.adventure_mode().await?,
                "3" => self.view_statistics().await?,
                "4" => self.settings_menu().await?,
                "5" | "q" | "quit" | "exit" => {
                    self.info("Thanks for playing! Keep learning!")?;
                    return Ok(());
                }
                _ => self.error("Invalid choice. Please try again.")?,
            }
        }
    }

    async fn custom_mode(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.header("Custom Mode")?;
        self.info("Choose your difficulty level:")?;
        writeln!(self.out)?;
        for (i, level) in CefrLevel::ALL.iter().enumerate() {
            writeln!(
                self.out,
                "{}. {} - {} (Best: {})",
                i + 1,
                level.as_str().to_uppercase(),
                level.description(),
                self.top_scores.level_best(*level)
            )?;
        }
        writeln!(self.out, "7. Back to main menu")?;

        let Some(choice) = self.prompt("\nChoose level (1-7): ").await? else {
            return Ok(());
        };
        match parse_level_choice(&choice) {
            Some(level) => {
                self.play(GameMode::Custom, Some(level)).await?;
            }
            None if choice == "7" => {}
            None => self.error("Invalid level selection.")?,
        }
        Ok(())
    }

    async fn adventure_mode(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.header("Adventure Mode")?;
        self.info("Random levels from A1 to B2!")?;
        self.warning("Each word comes from a random level to keep you on your toes.")?;
        writeln!(self.out)?;
        self.success(&format!(
            "Adventure Mode Best Score: {}",
            self.top_scores.mode_best(GameMode::Adventure)
        ))?;
        self.pause("Press Enter to start the adventure...").await?;
        self.play(GameMode::Adventure, None).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Game loop
    // -----------------------------------------------------------------------

    /// Play one sudden-death game and return its finished session.
    ///
    /// Each correct answer scores a point. A wrong answer, `quit`, or the end
    /// of input finishes the game. `skip` counts as a miss but continues.
    pub async fn play(&mut self, mode: GameMode, level: Option<CefrLevel>) -> Result<SessionStats> {
        let mut session = SessionStats::new(mode, level);
        let mut score = 0u32;
        let mut translation_failures = 0u32;

        self.info(&format!(
            "Game started! Mode: {mode}, Level: {}",
            level.map_or_else(|| "Random A1-B2".to_string(), |l| l.as_str().to_uppercase())
        ))?;
        tracing::info!(%mode, ?level, "game started");

        loop {
            let draw_level = match mode {
                GameMode::Adventure => CefrLevel::ADVENTURE.choose(&mut self.rng).copied(),
                GameMode::Custom => level,
            };

            let entry = match self.selector.draw_with(draw_level, &mut self.rng) {
                Ok(entry) => entry,
                Err(e) => {
                    self.error(&format!("{e}"))?;
                    break;
                }
            };

            self.clear_screen()?;
            let target = self.top_scores.target_for(mode, level);
            writeln!(
                self.out,
                "{}",
                format!(
                    "Score: {score} | Top Score: {target} | Level: {}",
                    entry.level.as_str().to_uppercase()
                )
                .bold()
            )?;
            writeln!(self.out)?;
            writeln!(
                self.out,
                "   {}  ({}, {})",
                entry.word.to_uppercase().cyan().bold(),
                entry.class,
                entry.level.as_str().to_uppercase()
            )?;
            writeln!(self.out)?;
            self.info("Translating the word...")?;

            let meanings = match self.translator.translate(&entry.word, &entry.class).await {
                Ok(meanings) if !meanings.is_empty() => meanings,
                outcome => {
                    if let Err(e) = outcome {
                        tracing::warn!("translation of '{}' failed: {e:#}", entry.word);
                    }
                    translation_failures += 1;
                    if translation_failures >= MAX_TRANSLATION_FAILURES {
                        self.error("Translations keep failing. Ending the game.")?;
                        break;
                    }
                    self.error("Failed to get translation. Skipping word...")?;
                    continue;
                }
            };
            translation_failures = 0;

            match self.read_answer(&meanings).await? {
                Answer::Quit => break,
                Answer::Skip => {
                    self.warning(&format!(
                        "Skipped! Possible meanings: {}",
                        preview(&meanings, 3)
                    ))?;
                    session.record_wrong(&entry, UserAnswer::Skipped, &meanings);
                    self.finish_word(&mut session, &entry, false, &meanings)?;
                    self.pause("Press Enter to continue...").await?;
                }
                Answer::Text(answer) if is_valid(&answer, &meanings) => {
                    score += 1;
                    self.success(&format!("Correct! Score: {score}"))?;
                    self.info(&format!("Possible meanings: {}", preview(&meanings, 5)))?;
                    self.finish_word(&mut session, &entry, true, &meanings)?;
                    if let Err(e) = SessionSnapshot::save(&self.paths.session(), score, &session) {
                        tracing::warn!("failed to save session snapshot: {e:#}");
                    }
                    self.pause("Press Enter to continue...").await?;
                }
                Answer::Text(answer) => {
                    self.error(&format!("Game Over! Your answer: '{answer}'"))?;
                    self.info(&format!("Correct meanings were: {}", meanings.join(", ")))?;
                    session.record_wrong(&entry, UserAnswer::Typed(answer), &meanings);
                    self.finish_word(&mut session, &entry, false, &meanings)?;
                    break;
                }
            }
        }

        self.end_game(&mut session, score).await?;
        Ok(session)
    }

    /// Read an answer, offering one hint before the real attempt.
    async fn read_answer(&mut self, meanings: &[String]) -> Result<Answer> {
        writeln!(
            self.out,
            "{}",
            format!(
                "What is the meaning of this word in {}?",
                self.target_language
            )
            .bold()
        )?;
        self.info("(Type 'hint' for a clue, 'skip' to skip, 'quit' to end game)")?;

        let mut hint_shown = false;
        loop {
            let Some(answer) = self.prompt("\nYour answer: ").await? else {
                return Ok(Answer::Quit);
            };
            match answer.to_lowercase().as_str() {
                "quit" => return Ok(Answer::Quit),
                "skip" => return Ok(Answer::Skip),
                "hint" if !hint_shown => {
                    hint_shown = true;
                    match meanings.first() {
                        Some(first) => {
                            let hint: String = first.chars().take(2).collect();
                            self.warning(&format!("Hint: {hint}..."))?;
                        }
                        None => self.warning("No hint available")?,
                    }
                }
                _ => return Ok(Answer::Text(answer)),
            }
        }
    }

    fn finish_word(
        &mut self,
        session: &mut SessionStats,
        entry: &VocabularyEntry,
        is_correct: bool,
        meanings: &[String],
    ) -> Result<()> {
        session.record(entry.level, is_correct);
        if let Err(e) = self.selector.record_outcome(entry, is_correct) {
            self.warning(&format!("Progress not saved: {e}"))?;
        }
        self.history.add(entry, is_correct, meanings);
        self.save_history();
        Ok(())
    }

    async fn end_game(&mut self, session: &mut SessionStats, score: u32) -> Result<()> {
        session.finish(score);
        let records = self.top_scores.record_session(session.clone());
        self.save_scores()?;
        tracing::info!(score, "game finished");

        self.clear_screen()?;
        self.header("Game Over")?;
        writeln!(self.out, "{}", format!("Final Score: {score}").bold())?;

        if !records.is_empty() {
            writeln!(self.out)?;
            self.success("NEW RECORD(S)!")?;
            for record in &records {
                self.success(&format!("   {record}"))?;
            }
        }

        self.session_summary(session)?;
        self.pause("Press Enter to return to main menu...").await?;
        Ok(())
    }

    fn session_summary(&mut self, session: &SessionStats) -> Result<()> {
        writeln!(self.out)?;
        self.info("Session Summary:")?;
        writeln!(self.out, "   Words Attempted: {}", session.words_attempted)?;
        writeln!(self.out, "   Words Correct: {}", session.words_correct)?;
        writeln!(self.out, "   Best Streak: {}", session.best_streak)?;
        if session.words_attempted > 0 {
            writeln!(self.out, "   Accuracy: {:.1}%", session.accuracy())?;
        }

        if !session.level_stats.is_empty() {
            writeln!(self.out)?;
            self.info("Performance by Level:")?;
            for (level, tally) in &session.level_stats {
                let accuracy = if tally.attempted > 0 {
                    tally.correct as f64 / tally.attempted as f64 * 100.0
                } else {
                    0.0
                };
                writeln!(
                    self.out,
                    "   {}: {}/{} ({accuracy:.1}%)",
                    level.as_str().to_uppercase(),
                    tally.correct,
                    tally.attempted
                )?;
            }
        }

        if !session.wrong_answers.is_empty() {
            writeln!(self.out)?;
            self.warning("Words You Got Wrong:")?;
            for (i, wrong) in session.wrong_answers.iter().enumerate() {
                writeln!(
                    self.out,
                    "   {}. {} ({}, {})",
                    i + 1,
                    wrong.entry.word.as_str().bold(),
                    wrong.entry.class,
                    wrong.entry.level.as_str().to_uppercase()
                )?;
                match &wrong.user_answer {
                    UserAnswer::Skipped => {
                        writeln!(self.out, "      Your answer: {}", "SKIPPED".yellow())?
                    }
                    UserAnswer::Typed(text) => {
                        writeln!(self.out, "      Your answer: {}", format!("'{text}'").red())?
                    }
                }
                writeln!(
                    self.out,
                    "      Correct: {}",
                    wrong.correct_meanings.join(", ").green()
                )?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Statistics and settings
    // -----------------------------------------------------------------------

    async fn view_statistics(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.header("Statistics")?;

        self.info("High Scores:")?;
        writeln!(self.out, "{}", report::high_scores_table(&self.top_scores))?;

        if !self.top_scores.sessions.is_empty() {
            writeln!(self.out)?;
            self.info("Recent Sessions (Last 5):")?;
            writeln!(self.out, "{}", report::sessions_table(&self.top_scores, LIST_LIMIT))?;
        }

        writeln!(self.out)?;
        self.info("Learning Progress:")?;
        writeln!(
            self.out,
            "{}",
            report::level_progress_table(&self.selector, &CefrLevel::ALL)
        )?;

        let difficult = self.selector.difficult_words(None, LIST_LIMIT);
        if !difficult.is_empty() {
            writeln!(self.out)?;
            self.warning("Words Needing Practice:")?;
            writeln!(self.out, "{}", report::word_table(&difficult))?;
        }

        let mastered = self.selector.mastered_words(None, LIST_LIMIT);
        if !mastered.is_empty() {
            writeln!(self.out)?;
            self.success("Mastered Words:")?;
            writeln!(self.out, "{}", report::word_table(&mastered))?;
        }

        if !self.history.recent_words.is_empty() {
            writeln!(self.out)?;
            self.info("Recently Appeared Words (Last 10):")?;
            writeln!(
                self.out,
                "{}",
                report::history_table(&self.history.recent_words, RECENT_LIMIT)
            )?;
        }

        if !self.history.wrong_words.is_empty() {
            writeln!(self.out)?;
            self.warning("Recently Missed Words (Last 10):")?;
            writeln!(
                self.out,
                "{}",
                report::history_table(&self.history.wrong_words, RECENT_LIMIT)
            )?;
        }

        self.pause("Press Enter to return to main menu...").await
    }

    async fn settings_menu(&mut self) -> Result<()> {
        loop {
            self.clear_screen()?;
            self.header("Settings")?;
            writeln!(self.out, "1. Reset All Statistics")?;
            writeln!(self.out, "2. Clear Translation Cache")?;
            writeln!(self.out, "3. Export Statistics")?;
            writeln!(self.out, "4. Reset Level High Score")?;
            writeln!(self.out, "5. Wipe All Data (Factory Reset)")?;
            writeln!(self.out, "6. About")?;
            writeln!(self.out, "7. Back to Main Menu")?;

            let Some(choice) = self.prompt("\nChoose option (1-7): ").await? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.reset_statistics().await?,
                "2" => self.clear_cache()?,
                "3" => self.export_statistics()?,
                "4" => self.reset_level_score().await?,
                "5" => self.factory_reset().await?,
                "6" => self.about()?,
                "7" => return Ok(()),
                _ => {
                    self.error("Invalid choice. Please try again.")?;
                    continue;
                }
            }
            self.pause("Press Enter to continue...").await?;
        }
    }

    async fn reset_statistics(&mut self) -> Result<()> {
        self.warning("This will reset ALL your progress and high scores!")?;
        let confirm = self.prompt("Type 'RESET' to confirm: ").await?;
        if confirm.as_deref() != Some("RESET") {
            return self.info("Reset cancelled.");
        }

        if let Err(e) = self.selector.reset_all() {
            self.warning(&format!("Progress not saved: {e}"))?;
        }
        self.top_scores = TopScores::default();
        self.save_scores()?;
        self.success("All statistics have been reset!")
    }

    fn clear_cache(&mut self) -> Result<()> {
        let cached = self.translator.cache_stats().cache_size;
        self.translator.clear_cache();
        self.success(&format!(
            "Translation cache cleared! Was caching {cached} translations."
        ))
    }

    fn export_statistics(&mut self) -> Result<()> {
        let path = self.paths.export_file(Local::now());
        let document =
            ExportDocument::new(&self.selector, &self.top_scores, self.translator.cache_stats());
        match document.write(&path) {
            Ok(()) => self.success(&format!("Statistics exported to: {}", path.display())),
            Err(e) => self.error(&format!("Export error: {e:#}")),
        }
    }

    async fn reset_level_score(&mut self) -> Result<()> {
        writeln!(self.out, "Choose level to reset:")?;
        for (i, level) in CefrLevel::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, level.as_str().to_uppercase())?;
        }

        let choice = self.prompt("\nChoose level (1-6): ").await?.unwrap_or_default();
        let Some(level) = parse_level_choice(&choice) else {
            return self.error("Invalid level selection.");
        };

        let label = level.as_str().to_uppercase();
        let confirm = self
            .prompt(&format!("Reset {label} high score? (y/N): "))
            .await?
            .unwrap_or_default();
        if !confirm.eq_ignore_ascii_case("y") {
            return self.info("Reset cancelled.");
        }

        self.top_scores.reset_level(level);
        self.save_scores()?;
        self.success(&format!("Reset {label} high score!"))
    }

    async fn factory_reset(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.header("Factory Reset")?;
        self.warning("DANGER: This will PERMANENTLY DELETE ALL DATA!")?;
        writeln!(self.out, "   - All high scores and statistics")?;
        writeln!(self.out, "   - All learning progress and word weights")?;
        writeln!(self.out, "   - The translation cache")?;
        writeln!(self.out, "   - Session and word history")?;
        self.warning("This action CANNOT be undone!")?;

        let first = self.prompt("\nType 'DELETE' to continue: ").await?;
        if first.as_deref() != Some("DELETE") {
            return self.info("Factory reset cancelled.");
        }
        self.error("FINAL WARNING: All your progress will be lost forever!")?;
        let second = self.prompt("Type 'WIPE ALL DATA' to confirm: ").await?;
        if second.as_deref() != Some("WIPE ALL DATA") {
            return self.info("Factory reset cancelled.");
        }

        let removed = self.paths.remove_documents()?;
        tracing::info!("factory reset removed {removed} file(s)");

        self.translator.clear_cache();
        self.top_scores = TopScores::default();
        self.history = WordHistory::default();
        if let Err(e) = self.selector.reset_all() {
            self.warning(&format!("Progress not saved: {e}"))?;
        }
        self.save_scores()?;
        self.save_history();

        self.success("Factory reset completed successfully!")?;
        self.info("All data has been wiped. You can start fresh with a clean slate.")
    }

    fn about(&mut self) -> Result<()> {
        self.clear_screen()?;
        self.header("About oxvocab")?;
        writeln!(self.out, "oxvocab {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(
            self.out,
            "   Vocabulary practice with {} translations from a language model.",
            self.target_language
        )?;
        writeln!(self.out)?;
        self.info("Learning Algorithm:")?;
        writeln!(self.out, "   - Words you get wrong appear more frequently")?;
        writeln!(self.out, "   - Mastered words appear less often")?;
        writeln!(self.out, "   - Progress is saved after every answer")?;
        writeln!(self.out)?;
        self.info("Game Modes:")?;
        writeln!(self.out, "   - Custom Mode: choose a CEFR level (A1-C2)")?;
        writeln!(self.out, "   - Adventure Mode: random levels A1-B2")?;
        writeln!(self.out)?;
        self.info("Answers:")?;
        writeln!(self.out, "   - Exact meanings are always accepted")?;
        writeln!(self.out, "   - A single word of 3+ letters may match part of a meaning")?;
        writeln!(self.out, "   - Several words must all belong to one meaning")?;
        Ok(())
    }
}

fn parse_level_choice(choice: &str) -> Option<CefrLevel> {
    let index: usize = choice.trim().parse().ok()?;
    index
        .checked_sub(1)
        .and_then(|i| CefrLevel::ALL.get(i))
        .copied()
}

fn preview(meanings: &[String], limit: usize) -> String {
    meanings
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
