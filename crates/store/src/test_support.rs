#![cfg(test)]
//! Contract checks shared by every `KvStore` backend. Each takes a fresh,
//! empty store behind the trait object.

use std::thread;

use crate::KvStore;

pub fn crud_scenario(s: &dyn KvStore<String, String>) {
    assert!(s.update("A".into(), "0".into()).unwrap_err().is_not_found());
    assert!(s.get(&"A".into()).unwrap_err().is_not_found());

    s.put("A".into(), "1".into());
    assert_eq!(s.get(&"A".into()).unwrap(), "1");
    s.update("A".into(), "2".into()).unwrap();
    assert_eq!(s.get(&"A".into()).unwrap(), "2");
    assert_eq!(s.delete(&"A".into()).unwrap(), "2");
    assert!(s.get(&"A".into()).unwrap_err().is_not_found());
    assert!(s.delete(&"A".into()).unwrap_err().is_not_found());
    assert!(s.update("A".into(), "3".into()).unwrap_err().is_not_found());
}

pub fn concurrent_puts_on_distinct_keys(s: &dyn KvStore<u32, u32>) {
    thread::scope(|scope| {
        for t in 0..8u32 {
            scope.spawn(move || {
                for i in 0..500 {
                    s.put(t * 1000 + i, i);
                }
            });
        }
    });
    for t in 0..8u32 {
        for i in 0..500 {
            assert_eq!(s.get(&(t * 1000 + i)).unwrap(), i);
        }
    }
}

pub fn concurrent_gets_agree(s: &dyn KvStore<String, String>) {
    s.put("k".into(), "stable".into());
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..1000 {
                    assert_eq!(s.get(&"k".into()).unwrap(), "stable");
                }
            });
        }
    });
}

pub fn racing_put_and_get(s: &dyn KvStore<String, String>) {
    let old = "o".repeat(64);
    let new = "n".repeat(64);
    s.put("k".into(), old.clone());
    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..2000 {
                let v = if i % 2 == 0 { new.clone() } else { old.clone() };
                s.put("k".into(), v);
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..2000 {
                    let v = s.get(&"k".into()).unwrap();
                    assert!(v == old || v == new, "torn value: {v}");
                }
            });
        }
    });
}

pub fn update_and_delete_never_resurrect(s: &dyn KvStore<u32, u32>) {
    for k in 0..200 {
        s.put(k, 0);
    }
    thread::scope(|scope| {
        scope.spawn(|| {
            for k in 0..200 {
                s.delete(&k).unwrap();
            }
        });
        scope.spawn(|| {
            for k in 0..200 {
                let _ = s.update(k, 1);
            }
        });
    });
    for k in 0..200 {
        assert!(s.get(&k).unwrap_err().is_not_found(), "key {k} came back");
    }
}
