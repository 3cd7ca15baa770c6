// ============================================================================
// Basic Usage Example
// ============================================================================

use decimal_dash::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn print_state(machine: &SessionMachine) {
    let snapshot = machine.snapshot();
    println!(
        "  [{}] score {} | lives {} | level {} | round {}{}",
        snapshot.clock(),
        snapshot.score,
        snapshot.lives,
        snapshot.level,
        snapshot.round,
        if snapshot.is_low_time() { " | hurry!" } else { "" }
    );
}

fn print_task(machine: &SessionMachine) {
    if let Some(task) = machine.current_task() {
        println!("Round task: {}  {}", task.display_value(), task.prompt());
        if !machine.choices().is_empty() {
            println!("  Choices: {}", machine.choices().join(" | "));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Decimal Dash Example ===\n");

    // Scripted tasks so the walkthrough is reproducible
    let source = ScriptedTaskSource::new(vec![
        (3.14159, Precision::new(2)?),
        (0.0045678, Precision::new(3)?),
        (9.996, Precision::new(3)?),
    ])?;

    let mut machine = SessionMachineBuilder::new()
        .with_task_source(Box::new(source))
        .with_event_handler(Arc::new(LoggingEventHandler))
        .build()?;

    let outcome = machine.start()?;
    print_task(&machine);
    if let Some(message) = outcome.message {
        println!("  {}", message);
    }

    // A correct answer
    let outcome = machine.submit("3.14")?;
    println!("> 3.14");
    if let Some(message) = outcome.message {
        println!("  {}", message);
    }
    print_state(&machine);

    // Feedback pause, then the next round opens on its own
    machine.advance(Duration::from_millis(1500));
    print_task(&machine);

    // Ask for a hint after typing a correct prefix
    let outcome = machine.hint("0.004")?;
    println!("> hint (typed 0.004)");
    if let Some(message) = outcome.message {
        println!("  {}", message);
    }
    let outcome = machine.submit("0.00457")?;
    println!("> 0.00457");
    if let Some(message) = outcome.message {
        println!("  {}", message);
    }
    print_state(&machine);

    machine.advance(Duration::from_millis(1500));
    print_task(&machine);

    // Let the clock run out
    machine.advance(Duration::from_secs(25));
    print_state(&machine);
    machine.advance(Duration::from_secs(5));
    if let Some(message) = machine.last_message() {
        println!("  {}", message);
    }
    print_state(&machine);

    // Multiple choice with random tasks
    println!("\n=== Multiple Choice ===\n");
    let mut quiz = SessionMachineBuilder::new()
        .significant_figures()
        .multiple_choice()
        .with_seed(2024)
        .build()?;
    quiz.start()?;
    print_task(&quiz);
    if let Some(answer) = quiz.current_answer() {
        let outcome = quiz.submit(answer.as_str())?;
        println!("> {}", answer);
        if let Some(message) = outcome.message {
            println!("  {}", message);
        }
    }

    // Standalone helpers
    println!("\n=== Helpers ===\n");
    let task = new_task(6, TaskKind::DecimalPlaces);
    let answer = canonical_answer(&task);
    println!("{} {} -> {}", task.display_value(), task.prompt(), answer);
    println!("Near misses: {:?}", distractors(&answer, &task).labels());
    println!("Checks '{}': {}", answer, check_answer(&task, answer.as_str()));

    println!("\n=== Example Complete ===");
    Ok(())
}
