use std::marker::PhantomData;

use crate::dao::PoolType;

/// Typed handle over the shared connection pool; the entity-specific
/// queries hang off `impl Table<T>` blocks in `dao`.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    _phantomdata: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType) -> Self {
        Table {
            pool,
            _phantomdata: PhantomData,
        }
    }
}
