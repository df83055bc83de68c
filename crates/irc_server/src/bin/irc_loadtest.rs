//! Manual load-generating client, not part of the protocol core. One OS
//! thread per simulated user (no async runtime in this crate's
//! dependency stack); each thread registers, joins a shared channel and
//! sends a PRIVMSG on an interval until the connection drops.

use std::io::Write;
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

const SERVER_ADDR: &str = "127.0.0.1:6667";
const NUM_CLIENTS: usize = 200;
const SPAWN_STAGGER: Duration = Duration::from_millis(5);
const MESSAGE_INTERVAL: Duration = Duration::from_millis(1000);

fn main() {
    println!("Starting load test: {NUM_CLIENTS} clients against {SERVER_ADDR}");

    let mut handles = Vec::with_capacity(NUM_CLIENTS);
    for id in 0..NUM_CLIENTS {
        handles.push(thread::spawn(move || {
            if let Err(e) = run_client(id) {
                eprintln!("client {id} error: {e}");
            }
        }));
        thread::sleep(SPAWN_STAGGER);
    }

    for handle in handles {
        let _ = handle.join();
    }
}

fn run_client(id: usize) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(SERVER_ADDR)?;
    let nick = format!("bot{id}");

    let login = format!("PASS pw\r\nNICK {nick}\r\nUSER {nick} 0 * :LoadTester\r\n");
    stream.write_all(login.as_bytes())?;
    stream.write_all(b"JOIN #stress_test\r\n")?;

    let mut count = 0usize;
    loop {
        thread::sleep(MESSAGE_INTERVAL);
        let msg = format!("PRIVMSG #stress_test :Message from {nick} - Load Testing...{count}\r\n");
        count += 1;
        if stream.write_all(msg.as_bytes()).is_err() {
            break;
        }
    }
    Ok(())
}
