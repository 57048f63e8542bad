//! Two lines wired together the way a microcontroller drives them: the RX
//! interrupt feeds every byte, the TX-complete interrupt chains the next one.

use std::collections::VecDeque;

use trivdl_frame::{FrameStatus, Line, TxByte};

const OP_ECHO_REQUEST: u8 = 0x10;
const OP_ECHO_REPLY: u8 = 0x11;

/// One end of a simulated UART with a TX interrupt enable bit.
struct Uart {
    line: Line<Vec<FrameStatus>>,
    tx_interrupt_enabled: bool,
}

impl Uart {
    fn new() -> Self {
        Self {
            line: Line::new(Vec::new()),
            tx_interrupt_enabled: false,
        }
    }

    fn start_tx(&mut self, payload: &[u8], wire: &mut VecDeque<u8>) {
        self.line.send(payload).unwrap();
        self.tx_interrupt_enabled = true;
        self.tx_isr(wire);
    }

    fn tx_isr(&mut self, wire: &mut VecDeque<u8>) {
        if !self.tx_interrupt_enabled {
            return;
        }
        if let Some(TxByte { byte, last }) = self.line.pull_tx_byte() {
            wire.push_back(byte);
            if last {
                self.tx_interrupt_enabled = false;
            }
        }
    }

    /// Responder behaviour of the echo demo: answer a request with the same
    /// body under the reply opcode.
    fn rx_isr(&mut self, byte: u8, wire: &mut VecDeque<u8>) {
        let Some(status) = self.line.receive_byte(byte) else {
            return;
        };
        self.line.user_mut().push(status);

        let message = self.line.rx_message();
        if status.is_ok() && message.first() == Some(&OP_ECHO_REQUEST) && !self.line.tx_pending()
        {
            let mut reply = message.to_vec();
            reply[0] = OP_ECHO_REPLY;
            self.line.release_rx();
            self.start_tx(&reply, wire);
        } else {
            self.line.release_rx();
        }
    }
}

fn pump(host: &mut Uart, mcu: &mut Uart, to_mcu: &mut VecDeque<u8>, to_host: &mut VecDeque<u8>) {
    for _ in 0..1_000 {
        if let Some(byte) = to_mcu.pop_front() {
            host.tx_isr(to_mcu);
            mcu.rx_isr(byte, to_host);
        }
        if let Some(byte) = to_host.pop_front() {
            mcu.tx_isr(to_host);
            host.rx_isr(byte, to_mcu);
        }
        if to_mcu.is_empty() && to_host.is_empty() {
            break;
        }
    }
}

#[test]
fn echo_request_is_answered() {
    let mut host = Uart::new();
    let mut mcu = Uart::new();
    let mut to_mcu = VecDeque::new();
    let mut to_host = VecDeque::new();

    host.start_tx(b"\x10payload\xba", &mut to_mcu);
    pump(&mut host, &mut mcu, &mut to_mcu, &mut to_host);

    assert_eq!(mcu.line.user(), &vec![FrameStatus::Ok]);
    assert_eq!(host.line.user(), &vec![FrameStatus::Ok]);
    assert_eq!(host.line.rx_message(), b"\x11payload\xba");
    assert!(!host.tx_interrupt_enabled);
    assert!(!mcu.tx_interrupt_enabled);
}

#[test]
fn noise_on_the_line_is_skipped() {
    let mut host = Uart::new();
    let mut mcu = Uart::new();
    let mut to_mcu = VecDeque::from(vec![0x00, 0xFF, 0x42]);
    let mut to_host = VecDeque::new();

    // Drain the noise first, then send the real request.
    pump(&mut host, &mut mcu, &mut to_mcu, &mut to_host);
    host.start_tx(b"\x10hi", &mut to_mcu);
    pump(&mut host, &mut mcu, &mut to_mcu, &mut to_host);

    assert_eq!(mcu.line.user(), &vec![FrameStatus::Ok]);
    assert_eq!(host.line.rx_message(), b"\x11hi");
}
