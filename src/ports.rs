// ABOUTME: Input/output port handles wrapping boxed byte streams

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read, Write};
use std::rc::Rc;

use crate::error::PortError;

/// A readable byte stream. Closing drops the inner handle; a second close
/// (or any read after close) is an error rather than a silent no-op.
#[derive(Clone)]
pub struct InputPort(Rc<RefCell<Option<Box<dyn Read>>>>, Rc<RefCell<Option<u8>>>);

impl InputPort {
    pub fn new(inner: Box<dyn Read>) -> Self {
        InputPort(Rc::new(RefCell::new(Some(inner))), Rc::new(RefCell::new(None)))
    }

    pub fn read_byte(&self) -> Result<Option<u8>, PortError> {
        if let Some(c) = self.1.borrow_mut().take() {
            return Ok(Some(c));
        }
        let mut guard = self.0.borrow_mut();
        let inner = guard.as_mut().ok_or(PortError::Closed)?;
        let mut buf = [0u8; 1];
        match inner.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(PortError::Io(e.to_string())),
        }
    }

    /// Reads a byte without consuming it, by reading and pushing it back.
    pub fn peek_byte(&self) -> Result<Option<u8>, PortError> {
        let byte = self.read_byte()?;
        if let Some(b) = byte {
            *self.1.borrow_mut() = Some(b);
        }
        Ok(byte)
    }

    pub fn close(&self) -> Result<(), PortError> {
        let mut guard = self.0.borrow_mut();
        if guard.take().is_none() {
            return Err(PortError::AlreadyClosed);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl fmt::Debug for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<input-port>")
    }
}

impl PartialEq for InputPort {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A writable byte stream, same close-once discipline as `InputPort`.
#[derive(Clone)]
pub struct OutputPort(Rc<RefCell<Option<Box<dyn Write>>>>);

impl OutputPort {
    pub fn new(inner: Box<dyn Write>) -> Self {
        OutputPort(Rc::new(RefCell::new(Some(inner))))
    }

    pub fn write_bytes(&self, bytes: &[u8]) -> Result<(), PortError> {
        let mut guard = self.0.borrow_mut();
        let inner = guard.as_mut().ok_or(PortError::Closed)?;
        inner
            .write_all(bytes)
            .and_then(|_| inner.flush())
            .map_err(|e: io::Error| PortError::Io(e.to_string()))
    }

    pub fn close(&self) -> Result<(), PortError> {
        let mut guard = self.0.borrow_mut();
        if guard.take().is_none() {
            return Err(PortError::AlreadyClosed);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<output-port>")
    }
}

impl PartialEq for OutputPort {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_byte_then_eof() {
        let port = InputPort::new(Box::new(Cursor::new(vec![b'x'])));
        assert_eq!(port.read_byte().unwrap(), Some(b'x'));
        assert_eq!(port.read_byte().unwrap(), None);
    }

    #[test]
    fn double_close_is_an_error() {
        let port = InputPort::new(Box::new(Cursor::new(Vec::<u8>::new())));
        port.close().unwrap();
        assert!(matches!(port.close(), Err(PortError::AlreadyClosed)));
    }

    #[test]
    fn read_after_close_is_an_error() {
        let port = InputPort::new(Box::new(Cursor::new(vec![b'x'])));
        port.close().unwrap();
        assert!(matches!(port.read_byte(), Err(PortError::Closed)));
    }

    #[test]
    fn write_round_trip() {
        let buf = Rc::new(RefCell::new(Vec::new()));
        struct Sink(Rc<RefCell<Vec<u8>>>);
        impl Write for Sink {
            fn write(&mut self, data: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(data);
                Ok(data.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let port = OutputPort::new(Box::new(Sink(buf.clone())));
        port.write_bytes(b"hi").unwrap();
        assert_eq!(&*buf.borrow(), b"hi");
    }
}
