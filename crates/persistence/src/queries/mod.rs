// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries, one module per table group. Rows are converted to
//! domain or data-model values here; raw Diesel rows never leave this module.

pub mod audit;
pub mod leads;
pub mod orders;
pub mod users;
