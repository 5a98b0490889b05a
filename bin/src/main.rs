use anyhow::Context;
use clap::{Parser, Subcommand};
use rs_wordle_advisor::scorers::{GuessRanker, ScoreMode};
use rs_wordle_advisor::*;
use std::fs::File;
use std::io;
use std::time::Instant;

/// Decision support for five-letter word puzzles: the advisor narrows the
/// candidates and suggests the guess expected to tell you the most.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the corpus file, with one `word,count[,prob]` line per word.
    #[clap(short = 'f', long)]
    corpus_file: String,

    /// The first word to guess.
    #[clap(short = 'i', long, default_value = "lares")]
    initial_guess: String,

    /// Weight hypothetical answers by corpus frequency instead of uniformly,
    /// and score guesses by residual entropy instead of remaining count.
    #[clap(short, long)]
    proportional: bool,

    /// Score each guess against a random subset of this many hypothetical
    /// answers instead of all of them.
    #[clap(short, long)]
    sample_size: Option<usize>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank starting guesses and print the best and worst tables.
    Rank {
        /// How many of the best guesses to print.
        #[clap(long, default_value_t = 10)]
        best: usize,
        /// How many of the worst guesses to print.
        #[clap(long, default_value_t = 10)]
        worst: usize,
    },
    /// Play a full game against a known hidden answer.
    Single { answer: String },
    /// Suggest guesses interactively while you provide the feedback.
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    let reader = io::BufReader::new(
        File::open(&args.corpus_file)
            .with_context(|| format!("could not open corpus file {}", args.corpus_file))?,
    );
    let corpus = Corpus::from_reader(reader)?;
    println!("There are {} corpus words.", corpus.len());

    let mode = if args.proportional {
        ScoreMode::ProportionalEntropy
    } else {
        ScoreMode::RemainingCount
    };
    let mut ranker = GuessRanker::new(mode);
    if let Some(size) = args.sample_size {
        ranker = ranker.with_sample_size(size);
    }

    match args.command {
        Command::Rank { best, worst } => run_rank(&corpus, ranker, best, worst)?,
        Command::Single { answer } => run_single(&corpus, ranker, &args.initial_guess, &answer)?,
        Command::Interactive => run_interactive(&corpus, ranker, &args.initial_guess)?,
    }

    println!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn run_rank(corpus: &Corpus, ranker: GuessRanker, best: usize, worst: usize) -> anyhow::Result<()> {
    let candidates = corpus.words();
    let cache = ranker.sample_distributions(corpus, &candidates)?;
    let means = cache.ranked_means();

    print_table("Best starting guesses:", &means[..means.len().min(best)]);
    let worst_start = means.len().saturating_sub(worst);
    print_table("Worst starting guesses:", &means[worst_start..]);
    Ok(())
}

fn print_table(title: &str, rows: &[(String, f64)]) {
    println!("\n{}", title);
    println!("|word|mean score|");
    println!("|----|----------|");
    for (word, mean) in rows {
        println!("|{}|{:.4}|", word, mean);
    }
}

fn run_single(
    corpus: &Corpus,
    ranker: GuessRanker,
    first_guess: &str,
    answer: &str,
) -> anyhow::Result<()> {
    let record = play_simulated(corpus, ranker, first_guess, answer)?;
    println!(
        "Solved it as {} in {} turns.",
        record.answer, record.turns
    );
    for (guess, feedback) in &record.history {
        println!("\t{} -> {}", guess, feedback);
    }
    Ok(())
}

fn run_interactive(corpus: &Corpus, ranker: GuessRanker, first_guess: &str) -> anyhow::Result<()> {
    println!(
        "Choose a word from the corpus and keep it hidden. For each guess, enter the \
         feedback as five symbols: 'g' for exact, 'y' for present elsewhere, 'r' for absent.\n\
         For example, if your word was \"spade\" and the guess was \"soapy\", you would enter \
         \"grgyr\"."
    );

    let solver = GameSolver::new(corpus, ranker, first_guess)?.with_turn_report(Box::new(
        |report| {
            println!(
                "Turn {}: guessed {}, {} words remain.",
                report.turn, report.guess, report.remaining
            );
            if !report.top_guesses.is_empty() {
                println!("Top next guesses:");
                for scored in report.top_guesses {
                    println!("\t{} ({:.4})", scored.word, scored.score);
                }
            }
        },
    ));

    let stdin = io::stdin();
    let mut source = InteractiveFeedback::new(stdin.lock(), io::stdout());
    let record = solver.play(&mut source)?;
    println!(
        "The answer is {}. It took me {} turns.",
        record.answer, record.turns
    );
    Ok(())
}
