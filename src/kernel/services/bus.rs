use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => f.write_str("info"),
            NoticeLevel::Error => f.write_str("error"),
        }
    }
}

/// User-visible message the host should surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug)]
pub enum HostMessage {
    Notice(Notice),
}

#[derive(Clone)]
pub struct HostBusSender {
    tx: Sender<HostMessage>,
}

pub struct HostBusReceiver {
    rx: Receiver<HostMessage>,
}

pub fn host_bus() -> (HostBusSender, HostBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (HostBusSender { tx }, HostBusReceiver { rx })
}

impl HostBusSender {
    pub fn send(&self, msg: HostMessage) -> Result<(), mpsc::SendError<HostMessage>> {
        self.tx.send(msg)
    }

    pub fn notice(
        &self,
        level: NoticeLevel,
        message: impl Into<String>,
    ) -> Result<(), mpsc::SendError<HostMessage>> {
        self.send(HostMessage::Notice(Notice {
            level,
            message: message.into(),
        }))
    }
}

impl HostBusReceiver {
    pub fn try_recv(&mut self) -> Result<HostMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn drain(&mut self) -> Vec<HostMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}
