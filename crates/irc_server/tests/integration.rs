//! Black-box integration tests driving the real listening socket with
//! `std::net::TcpStream`: registration, duplicate nick, first-join
//! becomes operator then kick, invite-only, key/limit enforcement, and
//! the quit-as-part compatibility quirk.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::Duration;

use irc_server::{Config, Reactor};

static NEXT_PORT: AtomicU16 = AtomicU16::new(20_000);

fn spawn_server(password: &str) -> u16 {
    let port = NEXT_PORT.fetch_add(1, Ordering::Relaxed);
    let config = Config::try_from_args(["irc_server", &port.to_string(), password]).unwrap();
    let mut reactor = Reactor::new(config).expect("reactor bind");
    thread::spawn(move || reactor.run());
    // give the reactor a moment to reach its first poll() iteration
    thread::sleep(Duration::from_millis(50));
    port
}

struct TestClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TestClient {
    fn connect(port: u16) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let writer = stream.try_clone().unwrap();
        TestClient {
            reader: BufReader::new(stream),
            writer,
        }
    }

    fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).unwrap();
    }

    fn recv_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("recv_line");
        line
    }
}

#[test]
fn registration_sends_welcome() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    let welcome = alice.recv_line();
    assert_eq!(welcome, ":ft_irc.min 001 alice :Welcome to ft_irc, alice\r\n");
}

#[test]
fn duplicate_nick_is_rejected() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    assert_eq!(alice.recv_line(), ":ft_irc.min 001 alice :Welcome to ft_irc, alice\r\n");

    let mut bob = TestClient::connect(port);
    bob.send("NICK alice\r\n");
    assert_eq!(
        bob.recv_line(),
        ":ft_irc.min 433 * alice :Nickname is already in use\r\n"
    );
}

#[test]
fn first_joiner_becomes_operator_then_kick() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    alice.recv_line(); // 001

    alice.send("JOIN #chan\r\n");
    assert_eq!(alice.recv_line(), ":alice!a@ft_irc.min JOIN :#chan\r\n");
    assert_eq!(alice.recv_line(), ":ft_irc.min 331 alice #chan :No topic is set\r\n");
    assert_eq!(
        alice.recv_line(),
        ":ft_irc.min 353 alice = #chan :@alice\r\n"
    );
    assert_eq!(
        alice.recv_line(),
        ":ft_irc.min 366 alice #chan :End of /NAMES list.\r\n"
    );

    let mut bob = TestClient::connect(port);
    bob.send("PASS pw\r\nNICK bob\r\nUSER b 0 * :Bob\r\n");
    bob.recv_line(); // 001
    bob.send("JOIN #chan\r\n");
    // drain bob's own JOIN/topic/names replies
    bob.recv_line();
    bob.recv_line();
    bob.recv_line();
    bob.recv_line();

    // alice sees bob's join broadcast
    assert_eq!(alice.recv_line(), ":bob!b@ft_irc.min JOIN :#chan\r\n");

    alice.send("KICK #chan bob :bye\r\n");
    assert_eq!(
        alice.recv_line(),
        ":alice!a@ft_irc.min KICK #chan bob :bye\r\n"
    );
    assert_eq!(
        bob.recv_line(),
        ":alice!a@ft_irc.min KICK #chan bob :bye\r\n"
    );
}

#[test]
fn invite_only_channel_requires_invite() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    alice.recv_line();
    alice.send("JOIN #c\r\n");
    for _ in 0..4 {
        alice.recv_line();
    }
    alice.send("MODE #c +i\r\n");

    let mut carol = TestClient::connect(port);
    carol.send("PASS pw\r\nNICK carol\r\nUSER c 0 * :Carol\r\n");
    carol.recv_line();
    carol.send("JOIN #c\r\n");
    assert_eq!(
        carol.recv_line(),
        ":ft_irc.min 473 carol #c :Cannot join channel (+i)\r\n"
    );

    alice.send("INVITE carol #c\r\n");
    assert_eq!(alice.recv_line(), ":ft_irc.min 341 alice carol #c\r\n");
    assert_eq!(
        carol.recv_line(),
        ":alice!a@ft_irc.min INVITE carol :#c\r\n"
    );

    carol.send("JOIN #c\r\n");
    assert_eq!(carol.recv_line(), ":carol!c@ft_irc.min JOIN :#c\r\n");
}

#[test]
fn key_and_limit_enforcement() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    alice.recv_line();
    alice.send("JOIN #c\r\n");
    for _ in 0..4 {
        alice.recv_line();
    }
    alice.send("MODE #c +k hunter2\r\n");

    let mut bob = TestClient::connect(port);
    bob.send("PASS pw\r\nNICK bob\r\nUSER b 0 * :Bob\r\n");
    bob.recv_line();
    bob.send("JOIN #c wrong\r\n");
    assert_eq!(
        bob.recv_line(),
        ":ft_irc.min 475 bob #c :Cannot join channel (+k)\r\n"
    );

    bob.send("JOIN #c hunter2\r\n");
    assert_eq!(bob.recv_line(), ":bob!b@ft_irc.min JOIN :#c\r\n");
    assert_eq!(alice.recv_line(), ":bob!b@ft_irc.min JOIN :#c\r\n");

    alice.send("MODE #c +l 2\r\n");
    let mut carol = TestClient::connect(port);
    carol.send("PASS pw\r\nNICK carol\r\nUSER c 0 * :Carol\r\n");
    carol.recv_line();
    carol.send("JOIN #c hunter2\r\n");
    assert_eq!(
        carol.recv_line(),
        ":ft_irc.min 471 carol #c :Cannot join channel (+l)\r\n"
    );
}

#[test]
fn quit_with_channel_argument_is_treated_as_part() {
    let port = spawn_server("pw");
    let mut alice = TestClient::connect(port);
    alice.send("PASS pw\r\nNICK alice\r\nUSER a 0 * :Alice\r\n");
    alice.recv_line();
    alice.send("JOIN #c\r\n");
    for _ in 0..4 {
        alice.recv_line();
    }

    alice.send("QUIT #c :later\r\n");
    assert_eq!(
        alice.recv_line(),
        ":alice!a@ft_irc.min PART #c :later\r\n"
    );

    // the connection stays open: a PING still gets a PONG
    alice.send("PING :hi\r\n");
    assert_eq!(alice.recv_line(), ":ft_irc.min PONG ft_irc.min :hi\r\n");
}
