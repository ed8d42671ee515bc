//! 记录缓冲
//!
//! 追加式有序存储：采集线程是唯一写者，导出/展示可并发快照。
//! 锁的临界区只覆盖内存操作，绝不跨越任何阻塞读写。

use parking_lot::Mutex;
use serdaq_record::Record;

/// 线程安全的追加式记录缓冲
///
/// # 不变量
///
/// - 插入顺序 = 到达顺序，永不重排、永不去重
/// - 会话进行中只追加；清空只通过 [`reset`](Self::reset)，
///   且调用方保证此时没有活动写者（Idle 或 Stopped）
#[derive(Debug)]
pub struct RecordBuffer {
    records: Mutex<Vec<Record>>,
}

impl RecordBuffer {
    /// 创建空缓冲
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// 尾部追加一条记录
    pub fn append(&self, record: Record) {
        self.records.lock().push(record);
    }

    /// 时间点快照（不可变副本）
    ///
    /// 在锁内完成克隆，写者最多被阻塞一次 `Vec` 克隆的时间。
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// 清空缓冲
    ///
    /// 仅允许在 Idle/Stopped（无活动写者）时调用，由控制层保证。
    pub fn reset(&self) {
        self.records.lock().clear();
    }
}

impl Default for RecordBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serdaq_record::{Schema, parse_line};
    use std::sync::Arc;

    fn record(raw: &str) -> Record {
        let schema = Schema::from_spec("a,b").unwrap();
        parse_line(raw, &schema).unwrap()
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let buffer = RecordBuffer::new();
        buffer.append(record("1,2"));
        buffer.append(record("3,4"));
        buffer.append(record("5,6"));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].fields(), &["1", "2"]);
        assert_eq!(snapshot[1].fields(), &["3", "4"]);
        assert_eq!(snapshot[2].fields(), &["5", "6"]);
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let buffer = RecordBuffer::new();
        buffer.append(record("1,2"));

        let snapshot = buffer.snapshot();
        buffer.append(record("3,4"));

        // 快照不随后续追加变化
        assert_eq!(snapshot.len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_reset_clears_all() {
        let buffer = RecordBuffer::new();
        buffer.append(record("1,2"));
        buffer.reset();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_concurrent_append_and_snapshot() {
        let buffer = Arc::new(RecordBuffer::new());

        let writer = {
            let buffer = buffer.clone();
            std::thread::spawn(move || {
                for i in 0..1000 {
                    buffer.append(record(&format!("{},{}", i, i)));
                }
            })
        };

        // 与写者并发快照：每个快照都必须是合法前缀
        for _ in 0..100 {
            let snapshot = buffer.snapshot();
            for (i, r) in snapshot.iter().enumerate() {
                assert_eq!(r.fields()[0], i.to_string());
            }
        }

        writer.join().unwrap();
        assert_eq!(buffer.len(), 1000);
    }
}
