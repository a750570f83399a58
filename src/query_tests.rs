#[cfg(test)]
mod tests {
    use crate::clause::{Direction, JoinKind};
    use crate::error::QueryError;
    use crate::params::Params;
    use crate::query::QueryBuilder;
    use crate::value::SqlValue;
    use crate::{select_cols, select_more_cols};
    use pretty_assertions::assert_eq;

    fn users() -> QueryBuilder {
        let mut qb = QueryBuilder::new();
        qb.from("users");
        qb
    }

    #[test]
    fn select_without_columns_is_wildcard() {
        let stmt = users().render().unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM users");
        assert!(stmt.params().is_empty());
    }

    #[test]
    fn select_keeps_caller_order() {
        let mut qb = users();
        select_cols!(qb, "name", "id");
        select_more_cols!(qb, ["email", "age"]);
        assert_eq!(
            qb.render().unwrap().sql(),
            "SELECT name, id, email, age FROM users"
        );
    }

    #[test]
    fn from_is_last_write_wins() {
        let mut qb = users();
        qb.from("accounts");
        assert_eq!(qb.table(), Some("accounts"));
        assert_eq!(qb.render().unwrap().sql(), "SELECT * FROM accounts");
    }

    #[test]
    fn render_without_table_fails() {
        let mut qb = QueryBuilder::new();
        qb.select("id");
        assert_eq!(qb.render(), Err(QueryError::MissingTable));
    }

    #[test]
    fn where_binds_named_parameter() {
        let mut qb = users();
        qb.where_("id", 5).unwrap();
        let stmt = qb.render().unwrap();
        assert!(stmt.sql().contains("WHERE id = @id"));
        assert_eq!(stmt.params().get("@id"), Some(&SqlValue::I64(5)));
    }

    #[test]
    fn and_or_chain_after_where() {
        let mut qb = users();
        qb.where_("status", "active")
            .unwrap()
            .and("age", 18)
            .unwrap()
            .or("vip", true)
            .unwrap();
        let stmt = qb.render().unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM users WHERE status = @status AND age = @age OR vip = @vip"
        );
        assert_eq!(stmt.params().len(), 3);
    }

    #[test]
    fn and_before_where_is_invalid_state() {
        let mut qb = users();
        let err = qb.and("x", 1).unwrap_err();
        assert!(matches!(err, QueryError::InvalidState(_)));
        assert!(qb.or("x", 1).is_err());
        assert!(qb.params().is_empty());
        assert!(!qb.has_where());
    }

    #[test]
    fn second_where_is_rejected_without_touching_params() {
        let mut qb = users();
        qb.where_("a", 1).unwrap();
        let before = qb.params().clone();

        let err = qb.where_("b", 2).unwrap_err();
        assert_eq!(err, QueryError::InvalidState("WHERE clause already provided once"));
        assert_eq!(qb.params(), &before);
        assert_eq!(
            qb.render().unwrap().sql(),
            "SELECT * FROM users WHERE a = @a"
        );
    }

    #[test]
    fn joins_render_in_call_order() {
        let mut qb = QueryBuilder::new();
        qb.from("customers")
            .join(JoinKind::Inner, "orders", "id", "customers", "order_id")
            .unwrap()
            .join("left", "items", "order_id", "orders", "id")
            .unwrap()
            .join(JoinKind::Right, "orders", "id", "customers", "order_id")
            .unwrap();
        assert_eq!(
            qb.render().unwrap().sql(),
            "SELECT * FROM customers \
             INNER JOIN orders.id = customers.order_id \
             LEFT JOIN items.order_id = orders.id \
             RIGHT JOIN orders.id = customers.order_id"
        );
    }

    #[test]
    fn unknown_join_kind_is_invalid_argument() {
        let mut qb = users();
        let err = qb.join("cross", "a", "id", "b", "a_id").unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { what: "join kind", .. }));
        assert_eq!(qb.render().unwrap().sql(), "SELECT * FROM users");
    }

    #[test]
    fn order_by_desc_and_invalid_direction() {
        let mut qb = users();
        qb.order_by("name", Direction::Descending).unwrap();
        assert!(qb.render().unwrap().sql().ends_with("ORDER BY name DESC"));

        let err = qb.order_by("age", "sideways").unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { what: "order direction", .. }));
        assert!(qb.render().unwrap().sql().ends_with("ORDER BY name DESC"));
    }

    #[test]
    fn order_by_is_last_write_wins() {
        let mut qb = users();
        qb.order_by_desc("name").order_by_asc("created_at");
        assert_eq!(
            qb.render().unwrap().sql(),
            "SELECT * FROM users ORDER BY created_at ASC"
        );
        qb.order_by("id", "desc").unwrap();
        assert!(qb.render().unwrap().sql().ends_with("ORDER BY id DESC"));
    }

    #[test]
    fn limit_with_and_without_offset() {
        let mut qb = users();
        qb.limit_offset(10, 20);
        assert!(qb.render().unwrap().sql().ends_with("LIMIT 10, 20"));

        qb.limit(10);
        let sql = qb.render().unwrap().sql().to_string();
        assert!(sql.ends_with("LIMIT 10"));
        assert!(!sql.contains(','));

        qb.limit(0);
        assert!(qb.render().unwrap().sql().ends_with("LIMIT 0"));
    }

    #[test]
    fn having_requires_group_by() {
        let mut qb = users();
        let err = qb.having("cnt", 3).unwrap_err();
        assert_eq!(err, QueryError::InvalidState("HAVING requires GROUP BY"));
        assert!(qb.or_having("cnt", 3).is_err());
        assert!(qb.params().is_empty());
    }

    #[test]
    fn or_having_requires_open_having() {
        let mut qb = users();
        qb.group_by("dept");
        let err = qb.or_having("cnt", 3).unwrap_err();
        assert_eq!(err, QueryError::InvalidState("HAVING clause not provided"));
    }

    #[test]
    fn having_chain_is_independent_of_where() {
        let mut qb = QueryBuilder::new();
        qb.select(["dept", "COUNT(*) AS cnt"])
            .from("employees")
            .group_by("dept")
            .having("dept", "sales")
            .unwrap()
            .having("region", 2)
            .unwrap()
            .or_having("region", 5)
            .unwrap();
        assert!(!qb.has_where());
        assert!(qb.has_having());

        let stmt = qb.render().unwrap();
        assert_eq!(
            stmt.sql(),
            "SELECT dept, COUNT(*) AS cnt FROM employees GROUP BY dept \
             HAVING dept = @dept AND region = @region OR region = @region_1"
        );
        assert_eq!(stmt.params().get("@region_1"), Some(&SqlValue::I64(5)));
    }

    #[test]
    fn repeated_keys_never_drop_bindings() {
        let mut qb = users();
        qb.where_("status", 1)
            .unwrap()
            .or("status", 2)
            .unwrap()
            .or("status", 3)
            .unwrap()
            .group_by("status")
            .having("status", 4)
            .unwrap();

        let stmt = qb.render().unwrap();
        assert_eq!(stmt.params().len(), 4);
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM users WHERE status = @status OR status = @status_1 \
             OR status = @status_2 GROUP BY status HAVING status = @status_3"
        );
        let values: Vec<&SqlValue> = stmt.params().iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            vec![
                &SqlValue::I64(1),
                &SqlValue::I64(2),
                &SqlValue::I64(3),
                &SqlValue::I64(4)
            ]
        );
    }

    #[test]
    fn seeded_params_are_kept_and_avoided() {
        let seed: Params = [("tenant", 7_i64)].into_iter().collect();
        let mut qb = QueryBuilder::with_params(seed);
        qb.from("users").where_("tenant", 9).unwrap();

        let stmt = qb.render().unwrap();
        assert_eq!(stmt.sql(), "SELECT * FROM users WHERE tenant = @tenant_1");
        assert_eq!(stmt.params().get("@tenant"), Some(&SqlValue::I64(7)));
        assert_eq!(stmt.params().get("@tenant_1"), Some(&SqlValue::I64(9)));
    }

    #[test]
    fn full_clause_order() {
        let mut qb = QueryBuilder::new();
        qb.limit_offset(5, 10)
            .order_by_desc("total")
            .group_by("c.id")
            .from("customers c")
            .select(["c.id", "SUM(o.amount) AS total"]);
        qb.join(JoinKind::Left, "orders", "customer_id", "c", "id")
            .unwrap()
            .where_("c.active", true)
            .unwrap()
            .having("c.id", 1)
            .unwrap();

        assert_eq!(
            qb.render().unwrap().sql(),
            "SELECT c.id, SUM(o.amount) AS total FROM customers c \
             LEFT JOIN orders.customer_id = c.id WHERE c.active = @c_active \
             GROUP BY c.id HAVING c.id = @c_id ORDER BY total DESC LIMIT 5, 10"
        );
    }

    #[test]
    fn render_is_idempotent() {
        let mut qb = users();
        qb.select(["id"])
            .where_("id", 1)
            .unwrap()
            .and("name", "bob")
            .unwrap()
            .order_by_asc("id")
            .limit(1);

        let first = qb.render().unwrap();
        let second = qb.render().unwrap();
        assert_eq!(first, second);
        assert!(qb.has_where());
        assert_eq!(qb.params().len(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must not contain '@'")]
    fn where_key_with_param_prefix_is_rejected() {
        let mut qb = users();
        let _ = qb.where_("@id", 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "must not contain '@'")]
    fn having_key_with_param_prefix_is_rejected() {
        let mut qb = users();
        let _ = qb.group_by("dept").having("@n", 1);
    }
}
