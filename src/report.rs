//! Text rendering of a finished session

use pm_slot::SessionReport;
use pm_stage::{StageCategory, StageTrace};

pub fn print_trace(trace: &StageTrace, report: Option<&SessionReport>) {
    let summary = trace.summary();
    println!("Session {} ({})", summary.trace_id, summary.game_id);
    println!("{:-<56}", "");
    for event in &trace.events {
        println!("{:>10.1} ms  {}", event.timestamp_ms, event.stage);
    }
    println!("{:-<56}", "");

    if let Some(report) = report {
        println!("Reels:    {}", report.face_names().join(" "));
        if report.degraded {
            println!("Degraded: force-settled {:?}", report.timed_out);
        }
    }
    match summary.has_won {
        Some(true) => println!("Outcome:  WIN"),
        Some(false) => println!("Outcome:  LOSE"),
        None => println!("Outcome:  unresolved"),
    }
    println!("Duration: {:.1} ms over {} events", summary.duration_ms, summary.event_count);
    println!(
        "Stages:   {} spin, {} presentation, {} interaction",
        trace.events_by_category(StageCategory::SpinLifecycle).len(),
        trace.events_by_category(StageCategory::Presentation).len(),
        trace.events_by_category(StageCategory::Interaction).len(),
    );
    for (key, value) in &trace.metadata {
        println!("{:<9} {}", format!("{}:", key), value);
    }

    for warning in trace.validate().warnings() {
        println!("warning: {}", warning);
    }
}
