//! Demo command set for the switchboard binary

use crate::{
    config::Config,
    core::{App, Dispatch, Flag},
    error::Result,
    help,
};
use anyhow::Context;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use tracing::{info, instrument};

/// Dispatch `argv` against the demo commands
#[instrument(skip(config))]
pub fn execute(config: &Config, argv: &[String]) -> anyhow::Result<()> {
    let mut app = demo_app().context("Failed to register commands")?;

    match app.run(argv.iter().cloned())? {
        Dispatch::Executed { path } => {
            info!("Finished '{}'", path.join(" "));
        }
        Dispatch::NoCommand if config.help.on_empty => {
            print!("{}", help::render(&config.program_name, &app.summaries()));
        }
        Dispatch::UnknownCommand(name) if config.help.on_unknown => {
            eprintln!("Unknown command: {}", name);
            print!("{}", help::render(&config.program_name, &app.summaries()));
        }
        Dispatch::NoCommand | Dispatch::UnknownCommand(_) => {}
    }
    Ok(())
}

/// Build the demo application
pub fn demo_app() -> Result<App> {
    let mut app = App::new()?;
    register_basic(&mut app)?;
    register_greet(&mut app)?;
    register_copy(&mut app)?;
    register_server(&mut app)?;
    Ok(app)
}

fn register_basic(app: &mut App) -> Result<()> {
    app.command("hello", "Say hello to the world", |c| {
        c.run(|| {
            println!("Hello, World!");
            Ok(())
        });
    })?;

    app.command("echo", "Echo a message", |c| {
        let message = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&message);
        c.flag(
            Flag::new("message")
                .short('m')
                .description("Message to echo")
                .required(),
            move |value, _| {
                *sink.borrow_mut() = value.to_string();
                Ok(())
            },
        );
        c.run(move || {
            println!("{}", message.borrow());
            Ok(())
        });
    })?;
    Ok(())
}

/// `greet` threads the full name through `--name` and `--lastname`
fn register_greet(app: &mut App) -> Result<()> {
    app.accumulating_command::<String, _>(
        "greet",
        "Greet a person with optional customizations",
        |c| {
            let greeting = Rc::new(RefCell::new("Hello".to_string()));
            let full_name = Rc::new(RefCell::new(String::new()));

            let greeting_sink = Rc::clone(&greeting);
            c.flag(
                Flag::new("greeting").short('g').description("Greeting to use"),
                move |value, previous| {
                    if !value.is_empty() {
                        *greeting_sink.borrow_mut() = value.to_string();
                    }
                    Ok(previous.unwrap_or_default())
                },
            );

            let name_sink = Rc::clone(&full_name);
            c.flag(
                Flag::new("name").short('n').description("First name"),
                move |value, _| {
                    *name_sink.borrow_mut() = value.to_string();
                    Ok(value.to_string())
                },
            );

            let last_sink = Rc::clone(&full_name);
            c.flag(
                Flag::new("lastname").short('l').description("Last name"),
                move |value, previous| {
                    let mut name = previous.unwrap_or_default();
                    if !value.is_empty() {
                        if !name.is_empty() {
                            name.push(' ');
                        }
                        name.push_str(value);
                    }
                    *last_sink.borrow_mut() = name.clone();
                    Ok(name)
                },
            );

            c.run(move || {
                println!("{} {}", greeting.borrow(), full_name.borrow());
                Ok(())
            });
        },
    )?;
    Ok(())
}

fn register_copy(app: &mut App) -> Result<()> {
    app.command("copy", "Copy files", |c| {
        let verbose = Rc::new(Cell::new(false));
        let sink = Rc::clone(&verbose);
        c.bool_flag(
            Flag::new("verbose")
                .short('v')
                .description("Show verbose output"),
            move |value| {
                sink.set(value);
                Ok(())
            },
        );
        c.run_with_args(move |args| {
            let [source, dest, ..] = args else {
                anyhow::bail!("copy requires source and destination arguments");
            };
            if verbose.get() {
                println!("Copying {} to {}", source, dest);
            } else {
                println!("Copying files...");
            }
            Ok(())
        });
    })?;
    Ok(())
}

fn register_server(app: &mut App) -> Result<()> {
    app.command("server", "Server management commands", |c| {
        c.subcommand("start", "Start the server", |sc| {
            let port = Rc::new(RefCell::new("8080".to_string()));
            let debug = Rc::new(Cell::new(false));
            let config = Rc::new(RefCell::new(None::<String>));

            let port_sink = Rc::clone(&port);
            sc.flag(
                Flag::new("port").short('p').description("Port to listen on"),
                move |value, _| {
                    if !value.is_empty() {
                        value
                            .parse::<u16>()
                            .with_context(|| format!("invalid port: {}", value))?;
                        *port_sink.borrow_mut() = value.to_string();
                    }
                    Ok(())
                },
            );
            let debug_sink = Rc::clone(&debug);
            sc.bool_flag(
                Flag::new("debug").short('d').description("Enable debug mode"),
                move |value| {
                    debug_sink.set(value);
                    Ok(())
                },
            );
            let config_sink = Rc::clone(&config);
            sc.flag(
                Flag::new("config")
                    .short('c')
                    .description("Path to config file"),
                move |value, _| {
                    *config_sink.borrow_mut() = Some(value.to_string()).filter(|v| !v.is_empty());
                    Ok(())
                },
            );
            sc.run(move || {
                println!("Starting server on port {}", port.borrow());
                if debug.get() {
                    println!("Debug mode enabled");
                }
                if let Some(path) = config.borrow().as_deref() {
                    println!("Using config file: {}", path);
                }
                Ok(())
            });
        });

        c.subcommand("status", "Check server status", |sc| {
            let json = Rc::new(Cell::new(false));
            let verbose = Rc::new(Cell::new(false));

            let json_sink = Rc::clone(&json);
            sc.flag(
                Flag::new("format")
                    .short('f')
                    .description("Output format (json|text)"),
                move |value, _| {
                    match value {
                        "" | "text" => json_sink.set(false),
                        "json" => json_sink.set(true),
                        other => anyhow::bail!("invalid format: {}", other),
                    }
                    Ok(())
                },
            );
            let verbose_sink = Rc::clone(&verbose);
            sc.bool_flag(
                Flag::new("verbose")
                    .short('v')
                    .description("Show detailed status"),
                move |value| {
                    verbose_sink.set(value);
                    Ok(())
                },
            );
            sc.run(move || {
                if json.get() {
                    println!(r#"{{"status": "running", "verbose": {}}}"#, verbose.get());
                } else {
                    println!("Server Status: Running");
                    if verbose.get() {
                        println!("Uptime: 2h 30m");
                        println!("Active connections: 42");
                    }
                }
                Ok(())
            });
        });

        c.subcommand("stop", "Stop the server", |sc| {
            let force = Rc::new(Cell::new(false));
            let timeout = Rc::new(RefCell::new("30".to_string()));

            let force_sink = Rc::clone(&force);
            sc.bool_flag(
                Flag::new("force")
                    .short('f')
                    .description("Force immediate shutdown"),
                move |value| {
                    force_sink.set(value);
                    Ok(())
                },
            );
            let timeout_sink = Rc::clone(&timeout);
            sc.flag(
                Flag::new("timeout")
                    .short('t')
                    .description("Shutdown timeout in seconds"),
                move |value, _| {
                    if !value.is_empty() {
                        *timeout_sink.borrow_mut() = value.to_string();
                    }
                    Ok(())
                },
            );
            sc.run(move || {
                if force.get() {
                    println!("Force stopping server...");
                } else {
                    println!("Gracefully stopping server (timeout: {}s)...", timeout.borrow());
                }
                Ok(())
            });
        });
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_app_registers_all_commands() {
        let app = demo_app().unwrap();
        for name in ["hello", "echo", "greet", "copy", "server"] {
            assert!(app.has_command(name), "missing {name}");
        }
        let server = app
            .summaries()
            .into_iter()
            .find(|c| c.name == "server")
            .unwrap();
        let subs: Vec<_> = server.subcommands.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subs, ["start", "status", "stop"]);
    }

    #[test]
    fn test_status_rejects_unknown_format() {
        let mut app = demo_app().unwrap();
        let err = app
            .run(["server", "status", "--format", "yaml"])
            .unwrap_err();
        assert_eq!(err.failed_flag(), Some("format"));
    }

    #[test]
    fn test_copy_without_destination_fails() {
        let mut app = demo_app().unwrap();
        assert!(app.run(["copy", "only-source"]).is_err());
    }
}
