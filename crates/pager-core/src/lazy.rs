//! Deferred pagination results.
//!
//! The row query behind a lazy page starts the first time any row-derived
//! accessor is awaited and runs once; every accessor shares its outcome. The
//! count query is a separate future and only runs if `count()` is awaited.

use crate::error::{PagerError, SharedPagerError};
use futures::{
    FutureExt, TryFutureExt,
    future::{BoxFuture, Shared},
};
use model::pagination::page::{CursorPage, OffsetPage};
use std::{future::Future, sync::Arc};

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, SharedPagerError>>>;

fn share<T, F>(fut: F) -> SharedResult<T>
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = Result<T, PagerError>> + Send + 'static,
{
    fut.map_err(Arc::new).boxed().shared()
}

pub struct LazyCursorPage<E> {
    page: SharedResult<Arc<CursorPage<E>>>,
    count: SharedResult<u64>,
}

impl<E: Send + Sync + 'static> LazyCursorPage<E> {
    pub(crate) fn new<P, C>(page: P, count: C) -> Self
    where
        P: Future<Output = Result<CursorPage<E>, PagerError>> + Send + 'static,
        C: Future<Output = Result<u64, PagerError>> + Send + 'static,
    {
        LazyCursorPage {
            page: share(page.map_ok(Arc::new)),
            count: share(count),
        }
    }

    async fn page(&self) -> Result<Arc<CursorPage<E>>, SharedPagerError> {
        self.page.clone().await
    }

    pub async fn nodes(&self) -> Result<Vec<E>, SharedPagerError>
    where
        E: Clone,
    {
        Ok(self.page().await?.nodes.clone())
    }

    pub async fn has_prev(&self) -> Result<bool, SharedPagerError> {
        Ok(self.page().await?.has_prev)
    }

    pub async fn has_next(&self) -> Result<bool, SharedPagerError> {
        Ok(self.page().await?.has_next)
    }

    pub async fn prev_cursor(&self) -> Result<Option<String>, SharedPagerError> {
        Ok(self.page().await?.prev_cursor.clone())
    }

    pub async fn next_cursor(&self) -> Result<Option<String>, SharedPagerError> {
        Ok(self.page().await?.next_cursor.clone())
    }

    pub async fn count(&self) -> Result<u64, SharedPagerError> {
        self.count.clone().await
    }

    /// Awaits rows and count together.
    pub async fn resolve(self) -> Result<CursorPage<E>, SharedPagerError>
    where
        E: Clone,
    {
        let (page, count) = futures::try_join!(self.page.clone(), self.count.clone())?;
        let mut page = Arc::unwrap_or_clone(page);
        page.count = Some(count);
        Ok(page)
    }
}

pub struct LazyOffsetPage<E> {
    page: SharedResult<Arc<OffsetPage<E>>>,
    count: SharedResult<u64>,
}

impl<E: Send + Sync + 'static> LazyOffsetPage<E> {
    pub(crate) fn new<P, C>(page: P, count: C) -> Self
    where
        P: Future<Output = Result<OffsetPage<E>, PagerError>> + Send + 'static,
        C: Future<Output = Result<u64, PagerError>> + Send + 'static,
    {
        LazyOffsetPage {
            page: share(page.map_ok(Arc::new)),
            count: share(count),
        }
    }

    pub async fn nodes(&self) -> Result<Vec<E>, SharedPagerError>
    where
        E: Clone,
    {
        Ok(self.page.clone().await?.nodes.clone())
    }

    pub async fn has_next(&self) -> Result<bool, SharedPagerError> {
        Ok(self.page.clone().await?.has_next)
    }

    pub async fn count(&self) -> Result<u64, SharedPagerError> {
        self.count.clone().await
    }

    pub async fn resolve(self) -> Result<OffsetPage<E>, SharedPagerError>
    where
        E: Clone,
    {
        let (page, count) = futures::try_join!(self.page.clone(), self.count.clone())?;
        let mut page = Arc::unwrap_or_clone(page);
        page.count = Some(count);
        Ok(page)
    }
}
