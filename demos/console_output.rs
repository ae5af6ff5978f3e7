//! Console output example
//!
//! Several worker threads write to stdout, stderr and the debug channel
//! through one explicit output context, then everything is drained on exit.
//!
//! Run with: cargo run --example console_output

use serial_output::prelude::*;
use serial_output::write_line;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let config = OutputConfig {
        colors: true,
        timestamps: Some(TimestampFormat::Iso8601),
        ..OutputConfig::default()
    };
    let output = Arc::new(OutputContext::with_config(&config)?);

    write_line!(output.out(), "=== Serial Output - Console Example ===")?;

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let output = Arc::clone(&output);
            thread::spawn(move || -> Result<()> {
                for step in 0..5 {
                    write_line!(output.out(), "worker {} step {}", worker, step)?;
                    if step == 3 {
                        write_line!(output.err(), "worker {} hit a recoverable problem", worker)?;
                    }
                    thread::sleep(Duration::from_millis(5));
                }
                write_line!(output.debug(), "worker {} finished", worker)?;
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        if let Ok(result) = handle.join() {
            result?;
        }
    }

    write_line!(
        output.out(),
        "debugger attached: {}",
        serial_output::sinks::debugger_attached()
    )?;

    // Everything queued above is written before this returns.
    output.exit();
    Ok(())
}
