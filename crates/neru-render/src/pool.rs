use std::sync::Mutex;

/// Per-renderer object pool for the native-cell and native-label arrays
/// (§4.9: "resized in place when capacity suffices and re-allocated when
/// not"). `acquire` hands out a cleared `Vec<T>`; `release` clears it and
/// returns it to the free list.
#[derive(Debug, Default)]
pub struct BufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
}

impl<T> BufferPool<T> {
    pub fn new() -> Self {
        Self { free: Mutex::new(Vec::new()) }
    }

    pub fn acquire(&self) -> Vec<T> {
        self.free.lock().unwrap().pop().unwrap_or_default()
    }

    pub fn release(&self, mut buf: Vec<T>) {
        buf.clear();
        self.free.lock().unwrap().push(buf);
    }

    pub fn pooled_len(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}
