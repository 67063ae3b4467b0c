#![allow(dead_code)]

//! In-memory device simulation for driving the dispatcher without
//! hardware. Pre-loaded request/reply pairs play the part of the
//! board's firmware.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rshfiq_cat::{Link, Transport};

struct SimInner {
    /// Bytes the simulated device has queued for the host.
    rx: VecDeque<u8>,
    /// Everything the host wrote, in order.
    sent: Vec<u8>,
    /// Scripted request -> reply pairs, consumed in order.
    script: VecDeque<(Vec<u8>, Vec<u8>)>,
    link: Link,
}

/// Handle for inspecting and scripting the simulated device.
#[derive(Clone)]
pub struct SimDevice(Rc<RefCell<SimInner>>);

impl SimDevice {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SimInner {
            rx: VecDeque::new(),
            sent: Vec::new(),
            script: VecDeque::new(),
            link: Link::Connected,
        })))
    }

    /// Script a reply: when the host sends exactly `request`, the
    /// device queues `reply` (CR appended) for reading.
    pub fn expect(&self, request: &[u8], reply: &[u8]) {
        let mut r = reply.to_vec();
        r.push(13);
        self.0
            .borrow_mut()
            .script
            .push_back((request.to_vec(), r));
    }

    /// Queue unsolicited bytes from the device.
    pub fn push_bytes(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Everything the host has written so far.
    pub fn sent(&self) -> Vec<u8> {
        self.0.borrow().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.0.borrow_mut().sent.clear();
    }

    pub fn set_link(&self, link: Link) {
        self.0.borrow_mut().link = link;
    }
}

impl Transport for SimDevice {
    fn bytes_available(&self) -> usize {
        self.0.borrow().rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.0.borrow_mut().rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut inner = self.0.borrow_mut();
        if inner.link == Link::Disconnected {
            return;
        }
        inner.sent.extend_from_slice(bytes);
        // Fire the next scripted reply if this write matches it.
        let matched = inner
            .script
            .front()
            .map_or(false, |(request, _)| request.as_slice() == bytes);
        if matched {
            let (_, reply) = inner.script.pop_front().unwrap();
            inner.rx.extend(reply);
        }
    }

    fn connection_state(&self) -> Link {
        self.0.borrow().link
    }
}
