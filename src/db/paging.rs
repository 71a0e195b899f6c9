// src/db/paging.rs

use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};

use crate::common::pagination::{PageRequest, SortSpec};

/// Executa COUNT + SELECT paginado com os mesmos filtros.
///
/// `from` inclui FROM/JOINs; `filtros` deve começar com " WHERE 1=1" e
/// acrescentar condições com `push_bind`, para que as duas consultas
/// vejam exatamente o mesmo conjunto.
pub async fn fetch_page<T>(
    pool: &PgPool,
    select: &str,
    from: &str,
    filtros: impl Fn(&mut QueryBuilder<'_, Postgres>),
    sort: &SortSpec,
    req: &PageRequest,
) -> Result<(Vec<T>, i64), sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) ");
    count.push(from);
    filtros(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Postgres>::new(select);
    query.push(" ");
    query.push(from);
    filtros(&mut query);
    sort.push_order_and_page(&mut query, req);
    let items = query.build_query_as::<T>().fetch_all(pool).await?;

    Ok((items, total))
}

/// Consulta do scroll infinito: ativos, busca por nome, ordenados por nome.
pub async fn fetch_slice<T>(
    pool: &PgPool,
    select_from: &str,
    filtros: impl Fn(&mut QueryBuilder<'_, Postgres>),
    order_by: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = QueryBuilder::<Postgres>::new(select_from);
    filtros(&mut query);
    query.push(" ORDER BY ").push(order_by);
    query.push(" OFFSET ").push_bind(skip);
    query.push(" LIMIT ").push_bind(limit);
    query.build_query_as::<T>().fetch_all(pool).await
}
