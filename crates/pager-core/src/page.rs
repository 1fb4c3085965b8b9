//! Page-number pagination over `LIMIT`/`OFFSET`.

use crate::{columns::ColumnMap, error::PagerError, lazy::LazyOffsetPage};
use connectors::query::QueryExecutor;
use model::{
    pagination::{
        order::{OrderBy, OrderSpec},
        page::OffsetPage,
        take::TakeBounds,
    },
    records::entity::{Entity, Field},
};
use planner::query::ast::common::OrderDir;
use tracing::debug;

pub struct PageOptions<F> {
    pub columns: ColumnMap<F>,
    pub take: TakeBounds,
}

impl<F: Field> Default for PageOptions<F> {
    fn default() -> Self {
        PageOptions {
            columns: ColumnMap::new(),
            take: TakeBounds::default(),
        }
    }
}

impl<F: Field> PageOptions<F> {
    pub fn columns(mut self, columns: ColumnMap<F>) -> Self {
        self.columns = columns;
        self
    }

    pub fn take(mut self, take: TakeBounds) -> Self {
        self.take = take;
        self
    }
}

/// Per-call input. Pages are 1-based; 0 is read as 1.
pub struct PageParams<F> {
    pub page: usize,
    pub take: Option<usize>,
    /// Replaces the configured ordering for this call.
    pub order_by: Option<Vec<OrderBy<F>>>,
}

impl<F> Default for PageParams<F> {
    fn default() -> Self {
        PageParams {
            page: 1,
            take: None,
            order_by: None,
        }
    }
}

impl<F> PageParams<F> {
    pub fn page(page: usize) -> Self {
        PageParams {
            page,
            ..Default::default()
        }
    }

    pub fn with_take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_order(mut self, order_by: OrderBy<F>) -> Self {
        self.order_by = Some(vec![order_by]);
        self
    }
}

struct PagePlan<Q> {
    rows: Q,
    count: Q,
    take: usize,
}

pub struct PagePaginator<E: Entity> {
    order: OrderSpec<E::Field>,
    columns: ColumnMap<E::Field>,
    take: TakeBounds,
}

impl<E: Entity> Clone for PagePaginator<E> {
    fn clone(&self) -> Self {
        PagePaginator {
            order: self.order.clone(),
            columns: self.columns.clone(),
            take: self.take,
        }
    }
}

impl<E: Entity> PagePaginator<E> {
    pub fn new(order: OrderSpec<E::Field>) -> Self {
        PagePaginator {
            order,
            columns: ColumnMap::new(),
            take: TakeBounds::default(),
        }
    }

    pub fn with_options(
        order: OrderSpec<E::Field>,
        options: PageOptions<E::Field>,
    ) -> Result<Self, PagerError> {
        Ok(PagePaginator {
            order,
            columns: options.columns,
            take: options.take.validate()?,
        })
    }

    pub fn order(&self) -> &OrderSpec<E::Field> {
        &self.order
    }

    pub async fn paginate<Q>(
        &self,
        query: &Q,
        params: PageParams<E::Field>,
    ) -> Result<OffsetPage<E>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        let plan = self.plan(query, params)?;
        let (nodes, count) = futures::try_join!(plan.rows.fetch(), plan.count.count())?;

        let mut page = assemble(nodes, plan.take);
        page.count = Some(count);
        Ok(page)
    }

    pub fn paginate_lazy<Q>(
        &self,
        query: &Q,
        params: PageParams<E::Field>,
    ) -> Result<LazyOffsetPage<E>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        let PagePlan { rows, count, take } = self.plan(query, params)?;

        Ok(LazyOffsetPage::new(
            async move {
                rows.fetch()
                    .await
                    .map(|nodes| assemble(nodes, take))
                    .map_err(PagerError::from)
            },
            async move { count.count().await.map_err(PagerError::from) },
        ))
    }

    fn plan<Q>(&self, query: &Q, params: PageParams<E::Field>) -> Result<PagePlan<Q>, PagerError>
    where
        Q: QueryExecutor<Entity = E>,
    {
        let order = match params.order_by {
            Some(declarations) => OrderSpec::normalize(declarations)?,
            None => self.order.clone(),
        };
        let page = params.page.max(1);
        let take = self.take.resolve(params.take);
        let offset = (page - 1).saturating_mul(take);
        debug!(page, take, offset, "Planning offset page");

        let count = query.clone();
        let mut rows = query.clone();
        for key in order.keys() {
            let column = self.columns.resolve(key.field, &rows);
            rows.add_ordering(column, OrderDir::from_ascending(key.ascending));
        }
        rows.offset(offset);
        rows.limit(take.saturating_add(1));

        Ok(PagePlan { rows, count, take })
    }
}

fn assemble<E>(mut nodes: Vec<E>, take: usize) -> OffsetPage<E> {
    let has_next = nodes.len() > take;
    nodes.truncate(take);
    OffsetPage {
        nodes,
        has_next,
        count: None,
    }
}
