//! Keyset ("seek") pagination.
//!
//! A page is located by the ordering values of its boundary row instead of a
//! row offset. Every call fetches one row more than it returns; the extra row
//! tells whether the scan can continue in the fetched direction.
//!
//! Going backward, the ordering is reversed and the seek predicate selects rows
//! strictly before the cursor. The fetched rows are then flipped back into
//! forward order before cursors are minted, so a page always reads the same
//! way regardless of the direction it was reached from.

use crate::{
    codec::{Base64Codec, CodecError, CursorCodec},
    columns::ColumnMap,
    error::PagerError,
    lazy::LazyCursorPage,
};
use connectors::query::QueryExecutor;
use model::{
    core::value::Value,
    pagination::{cursor::Cursor, order::OrderSpec, page::CursorPage, take::TakeBounds},
    records::entity::{Accessor, Entity, Field},
};
use planner::query::{
    ast::{common::OrderDir, expr::Expr},
    never,
    seek::{SeekTerm, seek_predicate},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// One ordering field, resolved to its value accessor.
pub struct SeekKey<E: Entity> {
    pub field: E::Field,
    pub ascending: bool,
    accessor: Accessor<E>,
}

impl<E: Entity> SeekKey<E> {
    fn new(field: E::Field, ascending: bool) -> Self {
        SeekKey {
            field,
            ascending,
            accessor: E::accessor(field),
        }
    }

    pub fn value(&self, node: &E) -> Value {
        (self.accessor)(node)
    }
}

impl<E: Entity> Clone for SeekKey<E> {
    fn clone(&self) -> Self {
        SeekKey {
            field: self.field,
            ascending: self.ascending,
            accessor: self.accessor,
        }
    }
}

pub struct CursorOptions<F> {
    pub columns: ColumnMap<F>,
    pub take: TakeBounds,
    pub codec: Arc<dyn CursorCodec>,
}

impl<F: Field> Default for CursorOptions<F> {
    fn default() -> Self {
        CursorOptions {
            columns: ColumnMap::new(),
            take: TakeBounds::default(),
            codec: Arc::new(Base64Codec),
        }
    }
}

impl<F: Field> CursorOptions<F> {
    pub fn columns(mut self, columns: ColumnMap<F>) -> Self {
        self.columns = columns;
        self
    }

    pub fn take(mut self, take: TakeBounds) -> Self {
        self.take = take;
        self
    }

    pub fn codec(mut self, codec: impl CursorCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }
}

/// Per-call input. At most one of the two cursors may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorParams {
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub take: Option<usize>,
}

impl CursorParams {
    /// The page following the row `token` was minted from.
    pub fn after(token: impl Into<String>) -> Self {
        CursorParams {
            next_cursor: Some(token.into()),
            ..Default::default()
        }
    }

    /// The page preceding the row `token` was minted from.
    pub fn before(token: impl Into<String>) -> Self {
        CursorParams {
            prev_cursor: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn with_take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    take: usize,
    forward: bool,
    after_cursor: bool,
}

struct CursorPlan<Q> {
    rows: Q,
    count: Q,
    window: Window,
}

pub struct CursorPaginator<E: Entity> {
    order: OrderSpec<E::Field>,
    reversed: OrderSpec<E::Field>,
    keys: Vec<SeekKey<E>>,
    columns: ColumnMap<E::Field>,
    take: TakeBounds,
    codec: Arc<dyn CursorCodec>,
}

impl<E: Entity> Clone for CursorPaginator<E> {
    fn clone(&self) -> Self {
        CursorPaginator {
            order: self.order.clone(),
            reversed: self.reversed.clone(),
            keys: self.keys.clone(),
            columns: self.columns.clone(),
            take: self.take,
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<E: Entity> CursorPaginator<E> {
    pub fn new(order: OrderSpec<E::Field>) -> Self {
        Self::build(order, CursorOptions::default())
    }

    pub fn with_options(
        order: OrderSpec<E::Field>,
        options: CursorOptions<E::Field>,
    ) -> Result<Self, PagerError> {
        let take = options.take.validate()?;
        Ok(Self::build(order, CursorOptions { take, ..options }))
    }

    fn build(order: OrderSpec<E::Field>, options: CursorOptions<E::Field>) -> Self {
        let keys = order
            .keys()
            .iter()
            .map(|key| SeekKey::new(key.field, key.ascending))
            .collect();

        CursorPaginator {
            reversed: order.reversed(),
            order,
            keys,
            columns: options.columns,
            take: options.take,
            codec: options.codec,
        }
    }

    pub fn order(&self) -> &OrderSpec<E::Field> {
        &self.order
    }

    pub fn take_bounds(&self) -> TakeBounds {
        self.take
    }

    pub async fn paginate<Q>(&self, query: &Q, params: CursorParams) -> Result<CursorPage<E>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        let plan = self.plan(query, &params)?;
        let (nodes, count) = futures::try_join!(plan.rows.fetch(), plan.count.count())?;

        let mut page = self.assemble(nodes, plan.window)?;
        page.count = Some(count);
        Ok(page)
    }

    /// Like [`paginate`](Self::paginate), but no query runs until a result
    /// accessor is awaited.
    pub fn paginate_lazy<Q>(
        &self,
        query: &Q,
        params: CursorParams,
    ) -> Result<LazyCursorPage<E>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        let CursorPlan { rows, count, window } = self.plan(query, &params)?;
        let paginator = self.clone();

        Ok(LazyCursorPage::new(
            async move {
                let nodes = rows.fetch().await?;
                paginator.assemble(nodes, window)
            },
            async move { count.count().await.map_err(PagerError::from) },
        ))
    }

    fn plan<Q>(&self, query: &Q, params: &CursorParams) -> Result<CursorPlan<Q>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        fn supplied(token: &Option<String>) -> Option<&str> {
            token.as_deref().filter(|t| !t.is_empty())
        }
        let (token, forward) = match (supplied(&params.prev_cursor), supplied(&params.next_cursor)) {
            (Some(_), Some(_)) => return Err(PagerError::ConflictingCursors),
            (Some(prev), None) => (Some(prev), false),
            (None, next) => (next, true),
        };
        let take = self.take.resolve(params.take);
        debug!(take, forward, cursor = token.is_some(), "Planning cursor page");

        let count = query.clone();
        let mut rows = query.clone();

        if let Some(token) = token {
            let predicate = self.seek(&rows, token, forward);
            rows.add_predicate(predicate);
        }

        let order = if forward { &self.order } else { &self.reversed };
        for key in order.keys() {
            let column = self.columns.resolve(key.field, &rows);
            rows.add_ordering(column, OrderDir::from_ascending(key.ascending));
        }
        rows.limit(take.saturating_add(1));

        Ok(CursorPlan {
            rows,
            count,
            window: Window {
                take,
                forward,
                after_cursor: forward && token.is_some(),
            },
        })
    }

    /// Seek predicate for `token`, or a predicate matching nothing when the
    /// token cannot be read.
    fn seek<Q: QueryExecutor>(&self, query: &Q, token: &str, forward: bool) -> Expr {
        match self.seek_terms(query, token) {
            Ok(terms) => seek_predicate(&terms, forward).unwrap_or_else(never),
            Err(err) => {
                warn!(%err, "Undecodable cursor, returning an empty page");
                never()
            }
        }
    }

    fn seek_terms<Q: QueryExecutor>(
        &self,
        query: &Q,
        token: &str,
    ) -> Result<Vec<SeekTerm>, CodecError> {
        let cursor = self.codec.decode(token)?;

        self.keys
            .iter()
            .map(|key| {
                let name = key.field.name();
                let value = cursor
                    .get(name)
                    .cloned()
                    .ok_or(CodecError::MissingField(name))?;
                Ok(SeekTerm {
                    column: self.columns.resolve(key.field, query),
                    ascending: key.ascending,
                    value,
                })
            })
            .collect()
    }

    fn assemble(&self, mut nodes: Vec<E>, window: Window) -> Result<CursorPage<E>, PagerError> {
        let fetched = nodes.len();
        let overflow = fetched > window.take;
        nodes.truncate(window.take);

        let (has_prev, has_next) = if window.forward {
            (window.after_cursor, overflow)
        } else {
            nodes.reverse();
            (overflow, true)
        };

        let prev_cursor = nodes.first().map(|node| self.mint(node)).transpose()?;
        let next_cursor = nodes.last().map(|node| self.mint(node)).transpose()?;
        debug!(fetched, has_prev, has_next, "Cursor page assembled");

        Ok(CursorPage {
            nodes,
            has_prev,
            has_next,
            prev_cursor,
            next_cursor,
            count: None,
        })
    }

    fn mint(&self, node: &E) -> Result<String, CodecError> {
        let cursor: Cursor = self
            .keys
            .iter()
            .map(|key| (key.field.name(), key.value(node)))
            .collect();
        self.codec.encode(&cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::JsonCodec,
        error::ConfigError,
        testing::{
            Account, AccountField, User, UserField, account_ids, accounts, ids, six_users, users,
        },
    };
    use model::pagination::{cursor::QualCol, order::OrderBy};
    use tracing_test::traced_test;

    fn by_name_then_id_desc() -> CursorPaginator<User> {
        let order = OrderBy::asc(UserField::Name)
            .then_desc(UserField::Id)
            .try_into()
            .unwrap();
        CursorPaginator::with_options(order, CursorOptions::default().take(TakeBounds::fixed(2)))
            .unwrap()
    }

    #[traced_test]
    #[tokio::test]
    async fn test_first_page() {
        let page = by_name_then_id_desc()
            .paginate(&six_users(), CursorParams::default())
            .await
            .unwrap();

        assert_eq!(ids(&page.nodes), vec![3, 1]);
        assert!(!page.has_prev);
        assert!(page.has_next);
        assert_eq!(page.count, Some(6));
        assert!(page.prev_cursor.is_some());
        assert!(logs_contain("Planning cursor page"));
    }

    #[tokio::test]
    async fn test_walks_forward_to_the_end() {
        let paginator = by_name_then_id_desc();
        let query = six_users();

        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        let second = paginator
            .paginate(&query, CursorParams::after(first.next_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&second.nodes), vec![5, 2]);
        assert!(second.has_prev);
        assert!(second.has_next);

        let third = paginator
            .paginate(&query, CursorParams::after(second.next_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&third.nodes), vec![6, 4]);
        assert!(third.has_prev);
        assert!(!third.has_next);
    }

    #[tokio::test]
    async fn test_backward_from_last_page() {
        let paginator = by_name_then_id_desc();
        let query = six_users();

        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        let second = paginator
            .paginate(&query, CursorParams::after(first.next_cursor.unwrap()))
            .await
            .unwrap();
        let third = paginator
            .paginate(&query, CursorParams::after(second.next_cursor.clone().unwrap()))
            .await
            .unwrap();

        let back = paginator
            .paginate(&query, CursorParams::before(third.prev_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&back.nodes), vec![5, 2]);
        assert!(back.has_prev);
        assert!(back.has_next);
        assert_eq!(back.next_cursor, second.next_cursor);
    }

    #[tokio::test]
    async fn test_backward_from_first_page_is_empty() {
        let paginator = by_name_then_id_desc();
        let query = six_users();

        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        let before = paginator
            .paginate(&query, CursorParams::before(first.prev_cursor.unwrap()))
            .await
            .unwrap();

        assert!(before.nodes.is_empty());
        assert!(!before.has_prev);
        assert!(before.has_next);
        assert_eq!(before.prev_cursor, None);
        assert_eq!(before.next_cursor, None);
    }

    #[tokio::test]
    async fn test_conflicting_cursors_are_rejected() {
        let params = CursorParams {
            prev_cursor: Some("a".into()),
            next_cursor: Some("b".into()),
            take: None,
        };
        let result = by_name_then_id_desc().paginate(&six_users(), params).await;
        assert!(matches!(result, Err(PagerError::ConflictingCursors)));
    }

    #[tokio::test]
    async fn test_empty_tokens_count_as_absent() {
        let paginator = by_name_then_id_desc();
        let query = six_users();
        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();

        let params = CursorParams {
            prev_cursor: Some(String::new()),
            next_cursor: first.next_cursor.clone(),
            take: None,
        };
        let second = paginator.paginate(&query, params).await.unwrap();
        assert_eq!(ids(&second.nodes), vec![5, 2]);
        assert!(second.has_prev);

        let page = paginator
            .paginate(&query, CursorParams::before(""))
            .await
            .unwrap();
        assert_eq!(page, first);
    }

    fn by_handle(columns: ColumnMap<AccountField>) -> CursorPaginator<Account> {
        CursorPaginator::with_options(
            OrderBy::asc(AccountField::Handle)
                .then_asc(AccountField::Id)
                .try_into()
                .unwrap(),
            CursorOptions::default()
                .columns(columns)
                .take(TakeBounds::fixed(2)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_column_override_drives_ordering_and_seek() {
        let paginator =
            by_handle(ColumnMap::new().with(AccountField::Handle, QualCol::new(Some("a"), "login")));
        let query = accounts();

        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        assert_eq!(account_ids(&first.nodes), vec![2, 5]);

        let second = paginator
            .paginate(&query, CursorParams::after(first.next_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(account_ids(&second.nodes), vec![1, 3]);

        let third = paginator
            .paginate(&query, CursorParams::after(second.next_cursor.clone().unwrap()))
            .await
            .unwrap();
        assert_eq!(account_ids(&third.nodes), vec![4]);
        assert!(!third.has_next);

        let back = paginator
            .paginate(&query, CursorParams::before(third.prev_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(account_ids(&back.nodes), vec![1, 3]);
        assert!(back.has_prev);
        assert_eq!(back.next_cursor, second.next_cursor);
    }

    #[tokio::test]
    async fn test_without_override_the_field_name_is_the_column() {
        let paginator = by_handle(ColumnMap::new());
        let query = accounts();

        // `a.handle` does not exist, so every handle reads as NULL.
        let first = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        assert_eq!(account_ids(&first.nodes), vec![1, 2]);

        let second = paginator
            .paginate(&query, CursorParams::after(first.next_cursor.unwrap()))
            .await
            .unwrap();
        assert!(second.nodes.is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_malformed_cursor_yields_empty_page() {
        let page = by_name_then_id_desc()
            .paginate(&six_users(), CursorParams::after("not a cursor!"))
            .await
            .unwrap();

        assert!(page.nodes.is_empty());
        assert!(page.has_prev);
        assert!(!page.has_next);
        assert_eq!(page.count, Some(6));
        assert!(logs_contain("Undecodable cursor"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_cursor_missing_an_ordering_field_is_undecodable() {
        let paginator = CursorPaginator::<User>::with_options(
            OrderBy::asc(UserField::Name).then_asc(UserField::Id).try_into().unwrap(),
            CursorOptions::default().codec(JsonCodec),
        )
        .unwrap();

        let page = paginator
            .paginate(&six_users(), CursorParams::after(r#"{"id":{"Int":1}}"#))
            .await
            .unwrap();

        assert!(page.nodes.is_empty());
        assert!(logs_contain("no value for field `name`"));
    }

    #[tokio::test]
    async fn test_zero_take_reports_flags_without_nodes() {
        let paginator = CursorPaginator::<User>::with_options(
            OrderBy::asc(UserField::Id).try_into().unwrap(),
            CursorOptions::default().take(TakeBounds::fixed(0)),
        )
        .unwrap();

        let page = paginator.paginate(&six_users(), CursorParams::default()).await.unwrap();
        assert!(page.nodes.is_empty());
        assert!(page.has_next);
        assert!(!page.has_prev);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_requested_take_is_clamped() {
        let paginator = CursorPaginator::<User>::with_options(
            OrderBy::asc(UserField::Id).try_into().unwrap(),
            CursorOptions::default().take(TakeBounds::new(2, 1, Some(4)).unwrap()),
        )
        .unwrap();
        let query = six_users();

        let page = paginator
            .paginate(&query, CursorParams::default().with_take(10))
            .await
            .unwrap();
        assert_eq!(ids(&page.nodes), vec![1, 2, 3, 4]);

        let page = paginator
            .paginate(&query, CursorParams::default().with_take(0))
            .await
            .unwrap();
        assert_eq!(ids(&page.nodes), vec![1, 2]);
    }

    #[test]
    fn test_invalid_take_bounds_fail_construction() {
        let options = CursorOptions::default().take(TakeBounds {
            default: 1,
            min: 5,
            max: None,
        });
        let result =
            CursorPaginator::<User>::with_options(OrderBy::asc(UserField::Id).try_into().unwrap(), options);

        assert!(matches!(
            result,
            Err(PagerError::Config(ConfigError::Take(_)))
        ));
    }

    #[tokio::test]
    async fn test_single_row_table() {
        let paginator = CursorPaginator::<User>::new(OrderBy::asc(UserField::Id).try_into().unwrap());
        let page = paginator
            .paginate(&users(&[(9, "solo")]), CursorParams::default())
            .await
            .unwrap();

        assert_eq!(ids(&page.nodes), vec![9]);
        assert!(!page.has_next);
        assert_eq!(page.prev_cursor, page.next_cursor);
    }

    #[tokio::test]
    async fn test_lazy_page_fetches_rows_once() {
        let paginator = by_name_then_id_desc();
        let query = six_users();
        let stats = query.stats();

        let lazy = paginator.paginate_lazy(&query, CursorParams::default()).unwrap();
        assert_eq!(stats.fetches(), 0);

        assert_eq!(ids(&lazy.nodes().await.unwrap()), vec![3, 1]);
        assert!(lazy.has_next().await.unwrap());
        assert!(!lazy.has_prev().await.unwrap());
        assert!(lazy.next_cursor().await.unwrap().is_some());
        assert_eq!(stats.fetches(), 1);
        assert_eq!(stats.counts(), 0);

        assert_eq!(lazy.count().await.unwrap(), 6);
        assert_eq!(stats.counts(), 1);
    }

    #[tokio::test]
    async fn test_lazy_resolve_matches_eager_page() {
        let paginator = by_name_then_id_desc();
        let query = six_users();

        let eager = paginator.paginate(&query, CursorParams::default()).await.unwrap();
        let lazy = paginator
            .paginate_lazy(&query, CursorParams::default())
            .unwrap()
            .resolve()
            .await
            .unwrap();

        assert_eq!(lazy, eager);
    }

    #[test]
    fn test_lazy_conflicting_cursors_fail_immediately() {
        let params = CursorParams {
            prev_cursor: Some("a".into()),
            next_cursor: Some("b".into()),
            take: None,
        };
        assert!(matches!(
            by_name_then_id_desc().paginate_lazy(&six_users(), params),
            Err(PagerError::ConflictingCursors)
        ));
    }
}
