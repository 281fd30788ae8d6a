//! Server driver tests

use bytes::Bytes;
use lectern_core::{ClaimSecret, ConnId};
use lectern_proto::{
    ClaimPresenter, ClientMessage, Frame, FrameHeader, Goto, InitRemote, RegisterViewer,
    ServerMessage,
};
use lectern_server::{
    DriverConfig, DriverError, ServerDriver, ServerEvent, SystemEnv, serve_stream, shared,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    sync::mpsc,
};

const SECRET: &str = "c0de";

fn driver() -> ServerDriver<SystemEnv> {
    ServerDriver::new(SystemEnv::new(), DriverConfig::default(), ClaimSecret::new(SECRET))
}

fn connect(driver: &mut ServerDriver<SystemEnv>, conn_id: ConnId) -> mpsc::Receiver<Bytes> {
    let (tx, rx) = mpsc::channel(16);
    driver.handle(ServerEvent::ConnectionAccepted { conn_id, outbound: tx }).unwrap();
    rx
}

fn send(driver: &mut ServerDriver<SystemEnv>, conn_id: ConnId, message: ClientMessage) {
    let frame = message.to_frame().unwrap();
    driver.handle(ServerEvent::FrameReceived { conn_id, frame }).unwrap();
}

fn disconnect(driver: &mut ServerDriver<SystemEnv>, conn_id: ConnId) {
    driver
        .handle(ServerEvent::ConnectionClosed { conn_id, reason: "test".to_string() })
        .unwrap();
}

fn drain(rx: &mut mpsc::Receiver<Bytes>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(bytes) = rx.try_recv() {
        let frame = Frame::decode(&bytes).unwrap();
        out.push(ServerMessage::from_frame(&frame).unwrap());
    }
    out
}

fn claim(pass: &str, slide: u32) -> ClientMessage {
    ClientMessage::ClaimPresenter(ClaimPresenter { pass: pass.to_string(), slide })
}

#[test]
fn presentation_walkthrough() {
    let mut driver = driver();
    let mut a = connect(&mut driver, 1);
    let mut b = connect(&mut driver, 2);

    send(&mut driver, 1, ClientMessage::RegisterViewer(RegisterViewer { total_slides: 10 }));
    assert_eq!(drain(&mut a), vec![ServerMessage::mode_presenter(false)]);

    send(&mut driver, 2, claim(SECRET, 3));
    assert_eq!(drain(&mut b), vec![ServerMessage::mode_presenter(true)]);
    assert_eq!(drain(&mut a), vec![ServerMessage::mode_view(Some(3))]);

    let mut c = connect(&mut driver, 3);
    send(&mut driver, 3, ClientMessage::RegisterRemote);
    assert_eq!(
        drain(&mut c),
        vec![ServerMessage::InitRemote(InitRemote { slide: 3, total_slides: 10 })]
    );

    send(&mut driver, 2, ClientMessage::Goto(Goto { slide: 4 }));
    assert_eq!(drain(&mut a), vec![ServerMessage::goto(4)]);
    assert_eq!(drain(&mut c), vec![ServerMessage::goto(4)]);
    assert!(drain(&mut b).is_empty());

    disconnect(&mut driver, 2);
    assert_eq!(drain(&mut a), vec![ServerMessage::mode_presenter(false)]);
    assert_eq!(drain(&mut c), vec![ServerMessage::mode_presenter(false)]);

    send(&mut driver, 3, ClientMessage::RegisterRemote);
    assert_eq!(
        drain(&mut c),
        vec![ServerMessage::InitRemote(InitRemote { slide: 0, total_slides: 0 })]
    );
}

#[test]
fn steal_demotes_only_the_previous_presenter() {
    let mut driver = driver();
    let mut a = connect(&mut driver, 1);
    let mut b = connect(&mut driver, 2);
    let mut v = connect(&mut driver, 3);

    send(&mut driver, 1, claim(SECRET, 1));
    drain(&mut a);
    drain(&mut b);
    drain(&mut v);

    send(&mut driver, 2, claim(SECRET, 7));

    assert_eq!(drain(&mut a), vec![ServerMessage::mode_view(Some(7))]);
    assert_eq!(drain(&mut b), vec![ServerMessage::mode_presenter(true)]);
    assert!(drain(&mut v).is_empty());
    assert_eq!(driver.engine().state().presenter(), Some(2));
}

#[test]
fn wrong_password_is_silent() {
    let mut driver = driver();
    let mut a = connect(&mut driver, 1);
    let mut b = connect(&mut driver, 2);

    send(&mut driver, 1, claim("nope", 5));

    assert!(drain(&mut a).is_empty());
    assert!(drain(&mut b).is_empty());
    assert_eq!(driver.engine().state().presenter(), None);
    assert_eq!(driver.engine().state().current_slide(), None);
}

#[test]
fn release_reaches_the_releasing_presenter_too() {
    let mut driver = driver();
    let mut a = connect(&mut driver, 1);
    let mut b = connect(&mut driver, 2);
    send(&mut driver, 1, claim(SECRET, 2));
    drain(&mut a);
    drain(&mut b);

    send(&mut driver, 1, ClientMessage::ReleasePresenter);

    assert_eq!(drain(&mut a), vec![ServerMessage::mode_presenter(false)]);
    assert_eq!(drain(&mut b), vec![ServerMessage::mode_presenter(false)]);
}

#[test]
fn capacity_refuses_without_attaching() {
    let config = DriverConfig { max_connections: 1, ..Default::default() };
    let mut driver = ServerDriver::new(SystemEnv::new(), config, ClaimSecret::new(SECRET));
    let _a = connect(&mut driver, 1);

    let (tx, mut rx) = mpsc::channel(4);
    let result = driver.handle(ServerEvent::ConnectionAccepted { conn_id: 2, outbound: tx });
    assert!(matches!(result, Err(DriverError::Session(_))));
    assert_eq!(driver.connection_count(), 1);

    send(&mut driver, 1, ClientMessage::RegisterViewer(RegisterViewer { total_slides: 3 }));
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn wrong_direction_frame_is_a_protocol_error() {
    let mut driver = driver();
    let _a = connect(&mut driver, 1);
    let frame = ServerMessage::mode_presenter(true).to_frame().unwrap();

    let result = driver.handle(ServerEvent::FrameReceived { conn_id: 1, frame });

    assert!(matches!(result, Err(DriverError::Protocol(_))));
    assert_eq!(driver.engine().state().presenter(), None);
}

async fn read_message(stream: &mut tokio::io::DuplexStream) -> ServerMessage {
    let mut header = [0u8; FrameHeader::SIZE];
    stream.read_exact(&mut header).await.unwrap();
    let size = FrameHeader::from_bytes(&header).unwrap().payload_size();
    let mut buf = header.to_vec();
    buf.resize(FrameHeader::SIZE + size, 0);
    stream.read_exact(&mut buf[FrameHeader::SIZE..]).await.unwrap();
    ServerMessage::from_frame(&Frame::decode(&buf).unwrap()).unwrap()
}

async fn write_message(stream: &mut tokio::io::DuplexStream, message: ClientMessage) {
    let mut buf = Vec::new();
    message.to_frame().unwrap().encode(&mut buf).unwrap();
    stream.write_all(&buf).await.unwrap();
}

#[tokio::test]
async fn serve_stream_round_trip_and_cleanup() {
    let driver = shared(driver());
    let (mut client, server) = tokio::io::duplex(4096);
    let (reader, writer) = tokio::io::split(server);

    let task = tokio::spawn(serve_stream(7, reader, writer, driver.clone()));

    write_message(&mut client, claim(SECRET, 2)).await;
    assert_eq!(read_message(&mut client).await, ServerMessage::mode_presenter(true));
    assert_eq!(driver.lock().await.engine().state().presenter(), Some(7));

    drop(client);
    task.await.unwrap().unwrap();

    let driver = driver.lock().await;
    assert_eq!(driver.engine().state().presenter(), None);
    assert_eq!(driver.connection_count(), 0);
}

#[tokio::test]
async fn serve_stream_drops_malformed_peer() {
    let driver = shared(driver());
    let (mut client, server) = tokio::io::duplex(4096);
    let (reader, writer) = tokio::io::split(server);

    let task = tokio::spawn(serve_stream(9, reader, writer, driver.clone()));

    client.write_all(&[0xAB; FrameHeader::SIZE]).await.unwrap();
    task.await.unwrap().unwrap();

    let mut rest = Vec::new();
    client.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
    assert_eq!(driver.lock().await.connection_count(), 0);
}
