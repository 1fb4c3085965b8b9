use crate::query::{
    ast::{
        common::TableRef,
        select::{FromClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.push("SELECT ");
        r.list(&self.projection);

        if let Some(from) = &self.from {
            from.render(r);
        }
        if let Some(filter) = &self.filter {
            r.push(" WHERE ");
            filter.render(r);
        }
        if !self.order_by.is_empty() {
            r.push(" ORDER BY ");
            r.list(&self.order_by);
        }
        if let Some(limit) = &self.limit {
            r.push(" LIMIT ");
            limit.render(r);
        }
        if let Some(offset) = &self.offset {
            r.push(" OFFSET ");
            offset.render(r);
        }
    }
}

impl Render for TableRef {
    fn render(&self, r: &mut Renderer) {
        if let Some(schema) = &self.schema {
            r.quoted(schema);
            r.push(".");
        }
        r.quoted(&self.name);
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.push(" FROM ");
        self.table.render(r);
        if let Some(alias) = &self.alias {
            r.push(" AS ");
            r.quoted(alias);
        }
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        r.push(" ");
        r.push(self.dir.keyword());
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::{OrderDir, TableRef},
            expr::{BinaryOperator, Expr},
        },
        builder::select::SelectBuilder,
        col,
        dialect::{MySql, Postgres},
        param, qcol,
        renderer::render,
    };
    use model::core::value::Value;

    #[test]
    fn test_filtered_select_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![col("id"), col("title")])
            .from(TableRef::new("posts"), None)
            .filter(col("id").eq(param(Value::Int(123))))
            .build();

        let (sql, params) = render(&ast, &Postgres);

        assert_eq!(sql, r#"SELECT "id", "title" FROM "posts" WHERE ("id" = $1)"#);
        assert_eq!(params, vec![Value::Int(123)]);
    }

    #[test]
    fn test_filtered_select_mysql() {
        let ast = SelectBuilder::new()
            .select(vec![col("id"), col("title")])
            .from(TableRef::new("posts"), None)
            .filter(col("title").eq(param(Value::from("abc"))))
            .build();

        let (sql, params) = render(&ast, &MySql);

        assert_eq!(sql, "SELECT `id`, `title` FROM `posts` WHERE (`title` = ?)");
        assert_eq!(params, vec![Value::from("abc")]);
    }

    #[test]
    fn test_ordered_page_postgres() {
        let ast = SelectBuilder::new()
            .select(vec![Expr::Raw("*".to_string())])
            .from(TableRef::in_schema("public", "posts"), Some("p"))
            .filter(Expr::binary(
                qcol("p", "status"),
                BinaryOperator::NotEq,
                param(Value::from("hidden")),
            ))
            .order_by(qcol("p", "created_at"), OrderDir::Desc)
            .order_by(qcol("p", "id"), OrderDir::Asc)
            .limit(11)
            .offset(20)
            .build();

        let (sql, params) = render(&ast, &Postgres);

        assert_eq!(
            sql,
            r#"SELECT * FROM "public"."posts" AS "p" WHERE ("p"."status" <> $1) ORDER BY "p"."created_at" DESC, "p"."id" ASC LIMIT $2 OFFSET $3"#
        );
        assert_eq!(
            params,
            vec![Value::from("hidden"), Value::Uint(11), Value::Uint(20)]
        );
    }

    #[test]
    fn test_count_select_keeps_filter_params() {
        let ast = SelectBuilder::new()
            .select(vec![col("id")])
            .from(TableRef::new("posts"), Some("p"))
            .filter(qcol("p", "draft").eq(param(Value::Boolean(false))))
            .order_by(qcol("p", "id"), OrderDir::Desc)
            .limit(3)
            .build();

        let (sql, params) = render(&ast.counting(), &MySql);

        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM `posts` AS `p` WHERE (`p`.`draft` = ?)"
        );
        assert_eq!(params, vec![Value::Boolean(false)]);
    }
}
