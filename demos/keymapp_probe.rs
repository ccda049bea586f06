use std::error::Error;
use std::process::ExitCode;

use keymapp_client::{KeymappClient, Rgb};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1).peekable();

    let address = if args.peek().is_some_and(|arg| arg == "--address") {
        args.next();
        let Some(address) = args.next() else {
            print_usage();
            return Ok(());
        };
        Some(address)
    } else {
        None
    };

    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };
    let rest: Vec<String> = args.collect();

    let client = match address {
        Some(address) => KeymappClient::connect(address).await?,
        None => KeymappClient::connect_default().await?,
    };

    match (command.as_str(), rest.as_slice()) {
        ("status", []) => {
            let status = client.get_status().await?;
            println!("Keymapp version: {}", status.version);
            match status.keyboard {
                Some(keyboard) => println!(
                    "Connected: {} (firmware {}, layer {})",
                    keyboard.friendly_name, keyboard.firmware_version, keyboard.current_layer
                ),
                None => println!("Connected: none"),
            }
        }
        ("keyboards", []) => {
            for keyboard in client.get_keyboards().await? {
                let marker = if keyboard.is_connected { "*" } else { " " };
                println!("{marker} {:>2}  {}", keyboard.id, keyboard.friendly_name);
            }
        }
        ("connect", []) => client.connect_any_keyboard().await?,
        ("connect", [id]) => client.connect_keyboard_index(id.parse()?).await?,
        ("disconnect", []) => client.disconnect_keyboard().await?,
        ("layer", [layer]) => client.set_layer(layer.parse()?).await?,
        ("unset-layer", [layer]) => client.unset_layer(layer.parse()?).await?,
        ("rgb-all", [color]) => client.set_rgb_all(color.parse::<Rgb>()?).await?,
        ("rgb", [color, leds @ ..]) if !leds.is_empty() => {
            let leds = leds
                .iter()
                .map(|led| led.parse::<i32>())
                .collect::<Result<Vec<_>, _>>()?;
            client.set_rgb_led(color.parse::<Rgb>()?, &leds).await?;
        }
        ("status-led", [led, state]) => {
            let on = match state.as_str() {
                "on" => true,
                "off" => false,
                _ => {
                    print_usage();
                    return Ok(());
                }
            };
            client.set_status_led(led.parse()?, on).await?;
        }
        ("brighter", []) => client.increase_brightness().await?,
        ("dimmer", []) => client.decrease_brightness().await?,
        _ => print_usage(),
    }

    client.close();
    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  cargo run --example keymapp_probe -- [--address <ADDR>] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  status                    show Keymapp version and connected keyboard");
    println!("  keyboards                 list detected keyboards");
    println!("  connect [ID]              connect any keyboard, or the one with ID");
    println!("  disconnect                disconnect the current keyboard");
    println!("  layer <N>                 activate layer N");
    println!("  unset-layer <N>           deactivate layer N");
    println!("  rgb <#RRGGBB> <LED>...    color individual LEDs");
    println!("  rgb-all <#RRGGBB>         color every LED");
    println!("  status-led <LED> on|off   toggle a status LED");
    println!("  brighter | dimmer         step the brightness");
}
