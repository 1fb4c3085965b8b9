//! Live database suites. They need a reachable server, so they are ignored by
//! default; run them with `--ignored` after pointing `PAGER_TEST_PG_URL` or
//! `PAGER_TEST_MYSQL_URL` at a scratch database.

#[cfg(test)]
mod tests {
    use crate::{Post, PostField, ids, mysql_url, pg_url, posts_fixture_sql};
    use connectors::{
        adapter::Adapter,
        sql::{
            base::adapter::SqlAdapter, mysql::adapter::MySqlAdapter, postgres::adapter::PgAdapter,
            query::SqlQuery,
        },
    };
    use model::{
        core::value::Value,
        pagination::{order::OrderBy, take::TakeBounds},
    };
    use pager_core::{
        cursor::{CursorOptions, CursorPaginator, CursorParams},
        page::{PageOptions, PageParams, PagePaginator},
    };
    use planner::query::{
        ast::{
            common::TableRef,
            expr::{BinaryOperator, Expr},
        },
        param, qcol,
    };
    use tracing_test::traced_test;

    async fn pg_posts(table: &str) -> SqlQuery<Post> {
        let adapter = PgAdapter::connect(&pg_url()).await.expect("connect postgres");
        adapter
            .exec(&posts_fixture_sql(table, "TIMESTAMP"))
            .await
            .expect("seed postgres");
        SqlQuery::new(Adapter::from(adapter), TableRef::new(table), "p")
    }

    async fn mysql_posts(table: &str) -> SqlQuery<Post> {
        let adapter = MySqlAdapter::connect(&mysql_url())
            .await
            .expect("connect mysql");
        adapter
            .exec(&posts_fixture_sql(table, "DATETIME"))
            .await
            .expect("seed mysql");
        SqlQuery::new(Adapter::from(adapter), TableRef::new(table), "p")
    }

    fn by_score(take: usize) -> CursorPaginator<Post> {
        CursorPaginator::with_options(
            OrderBy::desc(PostField::Score)
                .then_asc(PostField::Id)
                .try_into()
                .unwrap(),
            CursorOptions::default().take(TakeBounds::fixed(take)),
        )
        .unwrap()
    }

    fn newest_first(take: usize) -> CursorPaginator<Post> {
        CursorPaginator::with_options(
            OrderBy::desc(PostField::CreatedAt)
                .then_desc(PostField::Id)
                .try_into()
                .unwrap(),
            CursorOptions::default().take(TakeBounds::fixed(take)),
        )
        .unwrap()
    }

    async fn assert_cursor_walk(query: &SqlQuery<Post>) {
        let paginator = by_score(3);

        let first = paginator
            .paginate(query, CursorParams::default())
            .await
            .unwrap();
        assert_eq!(ids(&first.nodes), vec![2, 4, 7]);
        assert!(!first.has_prev);
        assert!(first.has_next);
        assert_eq!(first.count, Some(7));

        let second = paginator
            .paginate(query, CursorParams::after(first.next_cursor.clone().unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&second.nodes), vec![3, 6, 1]);
        assert!(second.has_prev);
        assert!(second.has_next);

        let third = paginator
            .paginate(query, CursorParams::after(second.next_cursor.clone().unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&third.nodes), vec![5]);
        assert!(!third.has_next);

        let back = paginator
            .paginate(query, CursorParams::before(second.prev_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(back, first);
    }

    async fn assert_timestamp_walk(query: &SqlQuery<Post>) {
        let paginator = newest_first(2);

        let first = paginator
            .paginate(query, CursorParams::default())
            .await
            .unwrap();
        assert_eq!(ids(&first.nodes), vec![7, 6]);

        let second = paginator
            .paginate(query, CursorParams::after(first.next_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&second.nodes), vec![5, 4]);

        let back = paginator
            .paginate(query, CursorParams::before(second.prev_cursor.unwrap()))
            .await
            .unwrap();
        assert_eq!(ids(&back.nodes), vec![7, 6]);
        assert!(!back.has_prev);
    }

    async fn assert_offset_pages(query: &SqlQuery<Post>) {
        let pager: PagePaginator<Post> = PagePaginator::with_options(
            OrderBy::desc(PostField::Score)
                .then_asc(PostField::Id)
                .try_into()
                .unwrap(),
            PageOptions::default().take(TakeBounds::fixed(3)),
        )
        .unwrap();

        let page = pager.paginate(query, PageParams::page(2)).await.unwrap();
        assert_eq!(ids(&page.nodes), vec![3, 6, 1]);
        assert!(page.has_next);
        assert_eq!(page.count, Some(7));

        let page = pager.paginate(query, PageParams::page(3)).await.unwrap();
        assert_eq!(ids(&page.nodes), vec![5]);
        assert!(!page.has_next);
    }

    async fn assert_filtered_lazy_page(query: SqlQuery<Post>) {
        let filtered = query.filter(Expr::binary(
            qcol("p", "score"),
            BinaryOperator::GtEq,
            param(Value::Int(20)),
        ));

        let lazy = by_score(2)
            .paginate_lazy(&filtered, CursorParams::default())
            .unwrap();
        assert_eq!(lazy.count().await.unwrap(), 5);
        assert_eq!(ids(&lazy.nodes().await.unwrap()), vec![2, 4]);
        assert!(lazy.has_next().await.unwrap());
    }

    #[traced_test]
    #[tokio::test]
    #[ignore]
    async fn test_postgres_pagination() {
        let query = pg_posts("pager_posts").await;

        let (sql, params) = query.render_count();
        assert_eq!(sql, r#"SELECT COUNT(*) FROM "pager_posts" AS "p""#);
        assert!(params.is_empty());

        assert_cursor_walk(&query).await;
        assert_timestamp_walk(&query).await;
        assert_offset_pages(&query).await;
        assert_filtered_lazy_page(query).await;
    }

    #[traced_test]
    #[tokio::test]
    #[ignore]
    async fn test_mysql_pagination() {
        let query = mysql_posts("pager_posts").await;

        let (sql, _) = query.render_count();
        assert_eq!(sql, "SELECT COUNT(*) FROM `pager_posts` AS `p`");

        assert_cursor_walk(&query).await;
        assert_timestamp_walk(&query).await;
        assert_offset_pages(&query).await;
        assert_filtered_lazy_page(query).await;
    }
}
